//! Console progress lines and the machine-readable batch report

pub mod console;
pub mod report;

pub use console::ConsoleReporter;
pub use report::{BatchReport, VideoFailure};
