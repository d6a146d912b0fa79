// ============================================================================
// Desktop Background
// ============================================================================
// Whichever setter is installed wins: swww, feh, xwallpaper.

use std::env;
use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, info};

use crate::error::{Error, Result};

/// Candidate setters in preference order: program and arguments before the path.
fn setters(wayland: bool) -> Vec<(&'static str, &'static [&'static str])> {
    let mut list: Vec<(&'static str, &'static [&'static str])> = Vec::new();
    if wayland {
        list.push(("swww", &["img"]));
    }
    list.push(("feh", &["--bg-fill"]));
    list.push(("xwallpaper", &["--zoom"]));
    list
}

pub fn change(image: &Path) -> Result<()> {
    let wayland = env::var_os("WAYLAND_DISPLAY").is_some();

    for (program, args) in setters(wayland) {
        let status = Command::new(program)
            .args(args)
            .arg(image)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => {
                info!("Wallpaper set with {}", program);
                return Ok(());
            }
            Ok(status) => debug!("{} exited with {}", program, status),
            Err(e) => debug!("{} not available: {}", program, e),
        }
    }

    Err(Error::Theme(format!(
        "could not set {} as wallpaper (tried swww, feh, xwallpaper)",
        image.display()
    )))
}
