//! # Storage Layer
//!
//! Persistence for captured project states.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Snapshots | Pretty JSON | `<state-dir>/states/project=<n>/<unix-ts>.json` |
//! | Config | TOML | `~/.config/drift/config.toml` |
//!
//! Snapshot writes are atomic (temp file + rename) and hold a `fs2`
//! exclusive lock while writing. Snapshots are write-once: a capture never
//! rewrites an existing file, and diffing only ever reads.

mod store;
mod config;

pub use config::Config;
pub use store::{StateStore, StoreError};
