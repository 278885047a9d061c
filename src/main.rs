//! bbd-hooks - lifecycle hooks for Capacitor Dynamics projects
//!
//! Usage:
//!   bbd-hooks install             # npm postinstall of the base plugin
//!   bbd-hooks uninstall           # npm preuninstall of the base plugin
//!   bbd-hooks sync                # after capacitor copy/update
//!   bbd-hooks sync --platform ios # one platform only
//!   bbd-hooks web-assets          # after the web bundle is compiled

use std::env;
use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use console::style;

use capacitor_dynamics_hooks::{
    hooks, npm_intent_from_env, HookResult, NpmIntent, Platform, ProjectContext,
};

#[derive(Parser)]
#[command(name = "bbd-hooks")]
#[command(about = "Patch generated Capacitor native projects for the BlackBerry Dynamics runtime")]
#[command(version)]
struct Cli {
    /// Capacitor app root (defaults to $INIT_CWD, then the current directory)
    #[arg(long, value_name = "PATH")]
    project_root: Option<PathBuf>,

    /// Root of the base plugin (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    plugin_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wire the sync hooks into the app and patch the iOS templates
    Install {
        /// Run even when the npm argv does not show this plugin being installed
        #[arg(long)]
        force: bool,
    },
    /// Restore everything the install and sync hooks changed
    Uninstall {
        /// Run even when the npm argv does not show this plugin being removed
        #[arg(long)]
        force: bool,
    },
    /// Patch the generated native project after capacitor copy/update
    Sync {
        /// Platform to sync (defaults to $CAPACITOR_PLATFORM_NAME, else both)
        #[arg(long)]
        platform: Option<Platform>,
    },
    /// Rewrite cordova_plugins.js after the web bundle is compiled
    WebAssets {
        /// Platforms to process (defaults to both)
        #[arg(long)]
        platform: Vec<Platform>,
    },
}

fn main() {
    let cli = Cli::parse();

    let project_root = cli
        .project_root
        .or_else(|| env::var_os("INIT_CWD").map(PathBuf::from))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let plugin_root = cli
        .plugin_root
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let ctx = match ProjectContext::discover(&project_root, &plugin_root) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            exit(1);
        }
    };

    if let Err(e) = run(cli.command, &ctx) {
        eprintln!("{} {}", style("✗").red(), e);
        exit(1);
    }
}

fn run(command: Command, ctx: &ProjectContext) -> HookResult<()> {
    match command {
        Command::Install { force } => {
            // npm runs lifecycle scripts for plenty of unrelated invocations
            // ('npm i', 'yarn', installs of other modules); act only when
            // this plugin itself is being installed
            if !force && npm_intent_from_env() != Some(NpmIntent::Install) {
                return Ok(());
            }
            hooks::install(ctx)
        }
        Command::Uninstall { force } => {
            if !force && npm_intent_from_env() != Some(NpmIntent::Uninstall) {
                return Ok(());
            }
            hooks::uninstall(ctx)
        }
        Command::Sync { platform } => {
            for platform in resolve_platforms(platform) {
                hooks::sync(ctx, platform)?;
            }
            Ok(())
        }
        Command::WebAssets { platform } => {
            let platforms = if platform.is_empty() {
                vec![Platform::Android, Platform::Ios]
            } else {
                platform
            };
            for platform in platforms {
                hooks::web_assets(ctx, platform)?;
            }
            Ok(())
        }
    }
}

/// Platform from the flag, then $CAPACITOR_PLATFORM_NAME, then both
fn resolve_platforms(flag: Option<Platform>) -> Vec<Platform> {
    if let Some(platform) = flag {
        return vec![platform];
    }

    if let Ok(name) = env::var("CAPACITOR_PLATFORM_NAME") {
        if let Ok(platform) = name.parse() {
            return vec![platform];
        }
    }

    vec![Platform::Android, Platform::Ios]
}
