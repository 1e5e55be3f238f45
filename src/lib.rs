#![doc = include_str!("../README.md")]

mod batcher;
mod config;
mod error;
pub mod fleet;
mod generator;
mod point;
pub mod report;

pub use batcher::{BatchOutcome, BatchProgress, Batcher, Builder, UploadSummary, partition};
pub use config::Config;
pub use error::{Error, Result};
pub use fleet::Fleet;
pub use generator::{Generator, Measurement, Window};
pub use point::{Field, Point};
