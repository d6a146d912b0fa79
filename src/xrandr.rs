// ============================================================================
// Display Resolution (xrandr)
// ============================================================================

use std::fmt;
use std::process::Command;
use std::str::FromStr;

use log::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Resolution { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `"<width>x<height>"`, e.g. `1920x1200`.
impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .trim()
            .split_once('x')
            .ok_or_else(|| Error::Parse(format!("resolution '{}' is not of the form WIDTHxHEIGHT", s)))?;
        let width = w
            .parse::<u32>()
            .map_err(|_| Error::Parse(format!("invalid width '{}' in resolution '{}'", w, s)))?;
        let height = h
            .parse::<u32>()
            .map_err(|_| Error::Parse(format!("invalid height '{}' in resolution '{}'", h, s)))?;
        if width == 0 || height == 0 {
            return Err(Error::Parse(format!("resolution '{}' has a zero dimension", s)));
        }
        Ok(Resolution::new(width, height))
    }
}

/// Uses the override when given, otherwise asks xrandr. Never cached.
pub fn get_resolution(resolution: Option<&str>) -> Result<Resolution> {
    match resolution {
        Some(value) => value.parse(),
        None => query_display(),
    }
}

/// Runs `xrandr` and reads the mode of the active output.
pub fn query_display() -> Result<Resolution> {
    let output = Command::new("xrandr")
        .output()
        .map_err(|e| Error::Query(format!("could not run xrandr: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Query(format!("xrandr exited with {}", output.status)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let resolution = parse_current_mode(&stdout)
        .ok_or_else(|| Error::Query("no active mode in xrandr output".to_string()))?;
    debug!("xrandr reports {}", resolution);
    Ok(resolution)
}

/// First token of the first line flagged with `*` (the current mode).
/// Tokens like `1920x1080i` or `1920x1080_60.00` keep their leading digits.
pub fn parse_current_mode(output: &str) -> Option<Resolution> {
    let line = output.lines().find(|line| line.contains('*'))?;
    let token = line.split_whitespace().next()?;
    let (w, rest) = token.split_once('x')?;

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let width = w.parse::<u32>().ok()?;
    let height = digits.parse::<u32>().ok()?;
    (width > 0 && height > 0).then(|| Resolution::new(width, height))
}
