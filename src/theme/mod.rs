// ============================================================================
// Theming - pywal compatible color scheme + desktop background
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Serialize, Serializer};

use crate::error::Result;

mod desktop;
mod export;
mod palette;
mod reload;
mod sequences;

/// Terminal background transparency handed to every palette.
pub const ALPHA: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn darken(self, amount: f32) -> Self {
        let f = |c: u8| (c as f32 * (1.0 - amount)) as u8;
        Rgb(f(self.0), f(self.1), f(self.2))
    }

    /// Even mix of two colors.
    pub fn blend(self, other: Rgb) -> Self {
        let f = |a: u8, b: u8| (0.5 * a as f32 + 0.5 * b as f32) as u8;
        Rgb(f(self.0, other.0), f(self.1, other.1), f(self.2, other.2))
    }

    /// Relative luminance, 0.0..=255.0.
    pub fn luminance(self) -> f32 {
        0.2126 * self.0 as f32 + 0.7152 * self.1 as f32 + 0.0722 * self.2 as f32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub wallpaper: PathBuf,
    /// Percent, 0..=100.
    pub alpha: u8,
    pub background: Rgb,
    pub foreground: Rgb,
    pub cursor: Rgb,
    pub colors: [Rgb; 16],
}

/// The downstream theming surface. Each step is independent; `apply`
/// decides the order.
pub trait Themer {
    fn palette(&self, image: &Path) -> Result<Palette>;

    /// Push the palette to running terminals.
    fn send_sequences(&self, palette: &Palette) -> Result<()>;

    /// Write theme files other programs read.
    fn export(&self, palette: &Palette) -> Result<()>;

    fn reload(&self) -> Result<()>;

    fn set_wallpaper(&self, image: &Path) -> Result<()>;
}

/// palette -> alpha -> terminals -> files -> reload -> background
pub fn apply(themer: &dyn Themer, image: &Path) -> Result<Palette> {
    let mut palette = themer.palette(image)?;
    palette.alpha = ALPHA;
    debug!("palette background {} foreground {}", palette.background, palette.foreground);

    themer.send_sequences(&palette)?;
    themer.export(&palette)?;
    themer.reload()?;
    themer.set_wallpaper(image)?;

    info!("Applied {} with alpha {}", image.display(), palette.alpha);
    Ok(palette)
}

/// Native pywal work-alike writing into `cache_dir` (usually `~/.cache/wal`).
pub struct Wal {
    cache_dir: PathBuf,
}

impl Wal {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Wal {
            cache_dir: cache_dir.into(),
        }
    }
}

impl Themer for Wal {
    fn palette(&self, image: &Path) -> Result<Palette> {
        palette::from_file(image)
    }

    fn send_sequences(&self, palette: &Palette) -> Result<()> {
        sequences::send(palette, &self.cache_dir)
    }

    fn export(&self, palette: &Palette) -> Result<()> {
        export::every(palette, &self.cache_dir)
    }

    fn reload(&self) -> Result<()> {
        reload::env(&self.cache_dir);
        Ok(())
    }

    fn set_wallpaper(&self, image: &Path) -> Result<()> {
        desktop::change(image)
    }
}
