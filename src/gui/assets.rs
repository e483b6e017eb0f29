/// Optional window icon and header banner read from the assets directory
use anyhow::{anyhow, Result};
use iced::window::Icon;
use std::path::{Path, PathBuf};

pub const ICON_FILE: &str = "icon.png";
pub const BANNER_FILE: &str = "banner.png";

/// Window icon from `icon.png`, if it exists and decodes
pub fn load_window_icon(assets_dir: &Path) -> Option<Icon> {
    let path = assets_dir.join(ICON_FILE);
    if !path.exists() {
        return None;
    }

    match decode_icon(&path) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!("Ignoring window icon: {}", e);
            None
        }
    }
}

/// Path of `banner.png` when present
pub fn banner_path(assets_dir: &Path) -> Option<PathBuf> {
    let path = assets_dir.join(BANNER_FILE);
    path.is_file().then_some(path)
}

fn decode_icon(path: &Path) -> Result<Icon> {
    let reader = image::io::Reader::open(path)
        .map_err(|e| anyhow!("Failed to open image: {}", e))?;

    let image = reader.decode()
        .map_err(|e| anyhow!("Failed to decode image: {}", e))?;

    let rgba_image = image.to_rgba8();
    let (width, height) = rgba_image.dimensions();

    iced::window::icon::from_rgba(rgba_image.into_raw(), width, height)
        .map_err(|e| anyhow!("Invalid icon data: {}", e))
}
