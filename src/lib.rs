pub mod answers;
pub mod catalog;
pub mod config;
pub mod output;
pub mod quiz;
pub mod scoring;
pub mod state;
pub mod telemetry;
