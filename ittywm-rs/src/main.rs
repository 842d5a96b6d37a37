mod core;
mod window;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::core::context::Context;
use crate::window::manager::WindowManager;
use crate::window::settings::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// X display to manage (defaults to $DISPLAY)
    #[arg(long)]
    display: Option<String>,

    /// Settings file (defaults to $XDG_CONFIG_HOME/ittywm-rs/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .init();

    info!("Starting ittywm-rs...");

    let settings = match args.config.or_else(Settings::default_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };

    let ctx = match Context::new(args.display.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to connect to X11 server: {}", e);
            return Err(e);
        }
    };
    info!("Screen: {}, Root Window: {:#x}", ctx.screen_num, ctx.root_window);

    ctx.grab_input(settings.ignore_lock_modifiers)?;
    info!("Modifier grabs established");

    let wm = WindowManager::new(ctx, settings);
    if let Err(e) = wm.run() {
        error!("Fatal X11 error - server disconnected: {}", e);
        return Err(e.into());
    }
    Ok(())
}
