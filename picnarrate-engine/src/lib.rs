pub mod orchestrator;
pub mod recordings;
pub mod traits;
pub mod waveform;
pub mod workflow;

#[cfg(test)]
mod testing;
