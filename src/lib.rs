// Library module for testable functions

pub mod cli;
pub mod config;
pub mod ingestion;
