//! Address import module - source, process and sink stages

pub mod error;
pub mod fetch;
pub mod parse;
pub mod pipeline;
pub mod process;
pub mod types;
pub mod utils;
pub mod write;

pub use error::IngestionError;
pub use types::*;
