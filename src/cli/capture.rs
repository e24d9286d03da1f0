//! `drift capture` command

use anyhow::{Context, Result};

use super::output::Output;
use crate::github::Client;
use crate::storage::{Config, StateStore};

pub struct CaptureArgs {
    pub project_number: u32,
    pub organization: Option<String>,
    pub start_field: String,
    pub end_field: String,
    pub token: String,
    pub state_dir: Option<String>,
}

pub fn run(output: &Output, config: &Config, args: CaptureArgs) -> Result<()> {
    let client = Client::new(args.token, output.is_verbose())?;

    output.verbose_ctx(
        "capture",
        &format!(
            "Fetching project {} (organization: {:?}, span fields: {}/{})",
            args.project_number, args.organization, args.start_field, args.end_field
        ),
    );

    let state = client
        .fetch_project_state(
            args.project_number,
            args.organization.as_deref(),
            &args.start_field,
            &args.end_field,
        )
        .context("Failed to fetch project state")?;

    output.verbose_ctx("capture", &format!("Fetched {} items", state.items.len()));

    let store = StateStore::new(config.resolve_state_dir(args.state_dir.as_deref()));
    let path = store.save(&state).context("Failed to save state")?;

    output.success(&format!("State captured and saved to {}", path.display()));
    Ok(())
}
