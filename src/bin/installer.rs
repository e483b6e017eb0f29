//! Office Installer - Main GUI Process
//!
//! This process:
//! - Resolves the working directory (next to the binary unless `--dir` is given)
//! - Loads the optional office_installer.json
//! - Runs the installer window

#![windows_subsystem = "windows"]

use office_installer::config::{self, load_config, resolve_work_dir};
use office_installer::gui::{self, GuiFlags};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Office Installer starting...");

    let flags = config::parse_args(std::env::args().skip(1));
    tracing::info!("Startup flags: {:?}", flags);

    let work_dir = flags.work_dir.unwrap_or_else(resolve_work_dir);
    let app_config = load_config(&work_dir);

    gui::run(GuiFlags {
        config: app_config,
        work_dir,
        architecture: flags.architecture.unwrap_or_default(),
        interactive: true,
    })?;

    Ok(())
}
