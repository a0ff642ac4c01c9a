//! Command-line arguments

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Public KLADR address directory
    Kladr,
    /// 2GIS API (not implemented)
    #[value(name = "2gis")]
    TwoGis,
    /// Local CSV file
    Csv,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "address-import")]
#[command(about = "Import city addresses into the database")]
pub struct Cli {
    /// Address source
    #[arg(long, value_enum, default_value_t = SourceKind::Kladr)]
    pub source: SourceKind,

    /// City name
    #[arg(long, default_value = "Tomsk")]
    pub city: String,

    /// API key for 2GIS
    #[arg(long)]
    pub api_key: Option<String>,

    /// CSV file to import
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Save the result to a CSV file instead of the database
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Do not save anything, only show statistics
    #[arg(long)]
    pub dry_run: bool,
}
