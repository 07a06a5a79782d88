pub mod endpoints;
pub mod parse;
pub mod request;
pub mod runtime;
pub mod upload;
pub mod waveform;
