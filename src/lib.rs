//! clipslicer
//!
//! Splits every video in a folder into fixed-duration clips. Each source
//! video is decoded frame by frame and re-encoded into consecutive MPEG-4
//! clips under `<output>/<name>/clips/`.
//!
//! The crate is laid out in layers: `domain` holds the partition rules,
//! `ports` the reader/writer contracts, `adapters` the libav and TOML
//! implementations, and `app` the enumerator, splitter and batch runner.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{BatchInteractor, ClipSplitter, VideoEnumerator};
pub use config::SplitterConfig;
pub use domain::model::{ClipPlan, ClipRecord, SplitSummary, VideoProperties};
pub use error::{ErrorKind, SplitError, SplitResult};
