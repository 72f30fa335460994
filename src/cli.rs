use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "edition-tools",
    version,
    about = "Conversion and comparison tooling for music edition sources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a Word source-description file into JSON.
    Convert(ConvertArgs),
    /// Compare two PDF files page by page as rendered images.
    ComparePdfs(ComparePdfsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Directory containing the Word file; the JSON output lands here too.
    pub directory: PathBuf,

    /// Name of the Word file, without the .docx extension.
    pub file_name: String,
}

#[derive(Args, Debug, Clone)]
pub struct ComparePdfsArgs {
    /// First PDF file.
    pub pdf1: PathBuf,

    /// Second PDF file; difference images are drawn onto its pages.
    pub pdf2: PathBuf,

    /// Output directory for difference images and the summary.
    pub output: PathBuf,

    /// Render resolution in dots per inch.
    #[arg(long, default_value_t = 350)]
    pub dpi: u32,

    /// Per-pixel grayscale difference above which a pixel counts as changed.
    #[arg(long, default_value_t = 75)]
    pub threshold: u8,
}
