//! GitHub Projects (v2) capture client

mod client;

pub use client::{Client, GithubError};
