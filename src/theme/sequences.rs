// ============================================================================
// Terminal Sequences
// ============================================================================
// OSC escape sequences understood by xterm-alikes.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;

use super::{Palette, Rgb};
use crate::error::Result;

const PTS_DIR: &str = "/dev/pts";

fn set_color(index: u16, color: Rgb) -> String {
    format!("\x1b]4;{};{}\x1b\\", index, color)
}

fn set_special(index: u16, color: Rgb, alpha: u8) -> String {
    if matches!(index, 11 | 708) && alpha != 100 {
        format!("\x1b]{};[{}]{}\x1b\\", index, alpha, color)
    } else {
        format!("\x1b]{};{}\x1b\\", index, color)
    }
}

pub fn create(palette: &Palette) -> String {
    let mut out = String::new();
    for (index, color) in palette.colors.iter().enumerate() {
        out.push_str(&set_color(index as u16, *color));
    }

    let (fg, bg, alpha) = (palette.foreground, palette.background, palette.alpha);
    out.push_str(&set_special(10, fg, alpha));
    out.push_str(&set_special(11, bg, alpha));
    out.push_str(&set_special(12, palette.cursor, alpha));
    out.push_str(&set_special(13, fg, alpha));
    out.push_str(&set_special(17, fg, alpha));
    out.push_str(&set_special(19, bg, alpha));
    out.push_str(&set_color(232, bg));
    out.push_str(&set_color(256, fg));
    out.push_str(&set_color(257, bg));
    out.push_str(&set_special(708, bg, alpha));
    out
}

/// Writes to every `/dev/pts/<n>` and keeps a copy as `<cache>/sequences`
/// so new shells can replay it.
pub fn send(palette: &Palette, cache_dir: &Path) -> Result<()> {
    send_to(palette, Path::new(PTS_DIR), cache_dir)
}

fn send_to(palette: &Palette, pts_dir: &Path, cache_dir: &Path) -> Result<()> {
    let sequences = create(palette);

    if let Ok(entries) = fs::read_dir(pts_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            if !name.to_string_lossy().chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let tty = entry.path();
            let written = fs::OpenOptions::new()
                .write(true)
                .open(&tty)
                .and_then(|mut f| f.write_all(sequences.as_bytes()));
            if let Err(e) = written {
                debug!("skipping {}: {}", tty.display(), e);
            }
        }
    }

    fs::create_dir_all(cache_dir)?;
    fs::write(cache_dir.join("sequences"), &sequences)?;
    Ok(())
}
