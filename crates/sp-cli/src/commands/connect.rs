//! Connect command implementations

use std::path::Path;

use anyhow::Result;

use sp_core::{ConnectError, ForwardingSpec};
use sp_orchestrator::SessionOutcome;

use super::absolute_path;
use super::runtime::Runtime;
use crate::output::{print_error, print_info, print_success};

async fn complete(
    runtime: &Runtime,
    result: Result<Option<SessionOutcome>, ConnectError>,
) -> Result<()> {
    match result {
        Ok(Some(outcome)) => {
            let verb = if outcome.created { "Opened" } else { "Reusing" };
            print_success(&format!("{} {}", verb, outcome.handle.key()));
            runtime.finish(outcome).await
        }
        Ok(None) => {
            print_info("Cancelled");
            Ok(())
        }
        Err(e) => {
            print_error(&e.to_string());
            Err(e.into())
        }
    }
}

/// Execute the open command
pub async fn open_command(runtime: &Runtime, server: Option<&str>) -> Result<()> {
    let result = match server {
        Some(server) => runtime.commands.open_server(server).await.map(Some),
        None => runtime.commands.open_connection().await,
    };
    complete(runtime, result).await
}

/// Execute the forward command
///
/// With both a server and a spec the wizard is skipped.
pub async fn forward_command(
    runtime: &Runtime,
    server: Option<&str>,
    spec: Option<&str>,
) -> Result<()> {
    let result = match (server, spec) {
        (Some(server), Some(spec)) => runtime
            .commands
            .forward_with(server, ForwardingSpec::new(spec))
            .await
            .map(Some),
        (Some(server), None) => runtime.commands.forward_to(server).await,
        (None, _) => runtime.commands.port_forwarding().await,
    };
    complete(runtime, result).await
}

/// Execute the fast-open command for a local file
pub async fn fast_open_command(runtime: &Runtime, file: &Path) -> Result<()> {
    let file = absolute_path(file)?;
    if let Some(target) = runtime
        .commands
        .on_active_file_changed(Some(&file.to_string_lossy()))
    {
        print_info(&target.label());
    }

    let result = runtime.commands.fast_open_connection().await.map(Some);
    complete(runtime, result).await
}
