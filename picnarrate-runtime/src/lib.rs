pub mod audio_cache;
pub mod config_store;
pub mod defaults;
pub mod describe;
pub mod fs;
