//! `drift snapshots` command

use anyhow::Result;

use super::output::Output;
use crate::storage::{Config, StateStore};

pub fn run(
    output: &Output,
    config: &Config,
    project_number: u32,
    state_dir: Option<&str>,
) -> Result<()> {
    let store = StateStore::new(config.resolve_state_dir(state_dir));
    let snapshots = store.list(project_number)?;

    output.verbose_ctx(
        "snapshots",
        &format!("Found {} snapshots for project {}", snapshots.len(), project_number),
    );

    if snapshots.is_empty() {
        println!("No snapshots found for project {}", project_number);
        return Ok(());
    }

    println!("Snapshots for project {}:", project_number);
    for (timestamp, path) in &snapshots {
        println!("  {}  {}", timestamp.format("%Y-%m-%d %H:%M:%S UTC"), path.display());
    }
    println!();
    println!("{} snapshot(s)", snapshots.len());

    Ok(())
}
