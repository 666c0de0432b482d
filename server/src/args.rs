use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
pub struct Args {
    /// Listening port.
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Path to the quantized ONNX model.
    #[arg(short, long, default_value = "models/detector.onnx")]
    pub model: PathBuf,

    /// Directory for per-request scratch files.
    #[arg(long, default_value = "uploads")]
    pub scratch_dir: PathBuf,

    /// No logging.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}
