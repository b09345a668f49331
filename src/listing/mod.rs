//! Output image listing subsystem.
//!
//! Answers "what images exist right now" for the generation pipeline's
//! output directory. Every call scans the directory fresh; nothing is
//! cached or remembered across requests.

pub mod scanner;

pub use scanner::{scan_output_dir, ImageEntry};
