use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use common::WorkspaceId;
use resolver::{AppContext, ResolverConfig, logging};
use tracing::error;

/// Resolve workspace ids to their flavour and members-panel variant.
#[derive(Parser, Debug)]
#[command(name = "workspace-resolver", version)]
struct Args {
    /// YAML config file (defaults to $WORKSPACE_RESOLVER_CONFIG, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON workspace list, overriding `metadata_path` from the config
    #[arg(short, long)]
    metadata: Option<PathBuf>,

    /// Workspace ids to resolve
    #[arg(required = true)]
    workspaces: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = ResolverConfig::load_or_default(args.config.as_deref())
        .context("loading resolver config")?;
    if let Some(path) = args.metadata {
        config.metadata_path = Some(path);
    }

    logging::init_subscriber(&config.logging);

    let ctx = AppContext::from_config(config);
    let mut failed = false;

    for raw in args.workspaces {
        let id = WorkspaceId::from(raw);
        match ctx.workspace(&id).await {
            Ok(workspace) => {
                let panel = ctx.members_panel(&workspace, false);
                println!("{} {} {}", workspace.id, workspace.flavour, panel.variant());
            }
            Err(e) => {
                error!(workspace = %id, fatal = e.is_fatal(), "{e}");
                failed = true;
            }
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
