//! # Command-Line Interface
//!
//! User-facing commands:
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `capture` | Fetch a project's current state and save a snapshot |
//! | `diff` | Compare the snapshots nearest two points in time |
//! | `snapshots` | List captured snapshots for a project |
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! drift --verbose diff -p 7 --range "last 1 week"
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod capture;
mod diff_cmd;
mod snapshots;

pub use app::{run, Cli, Commands, ReportFormat};
pub use output::Output;
