pub mod classifier;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod feedback;
pub mod frame_source;
pub mod observation;
pub mod progress;
pub mod report;
pub mod session;
pub mod shot;
pub mod stats;
pub mod trajectory;

#[cfg(test)]
mod benchmark_tests;
