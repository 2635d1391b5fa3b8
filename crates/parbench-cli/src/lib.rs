//! # parbench-cli
//!
//! Terminal output, progress display, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;
pub mod ui;

pub use presenter::{CLIProgressReporter, CLIResultPresenter};
