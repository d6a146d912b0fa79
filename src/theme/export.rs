// ============================================================================
// Theme File Export
// ============================================================================
// colors.json, colors.sh, colors and colors.Xresources, as pywal writes them.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::{Palette, Rgb};
use crate::error::Result;

#[derive(Serialize)]
struct ColorsJson<'a> {
    wallpaper: &'a Path,
    alpha: String,
    special: Special,
    colors: NumberedColors<'a>,
}

#[derive(Serialize)]
struct Special {
    background: Rgb,
    foreground: Rgb,
    cursor: Rgb,
}

// color0..color15 in numeric order
struct NumberedColors<'a>(&'a [Rgb; 16]);

impl Serialize for NumberedColors<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (i, color) in self.0.iter().enumerate() {
            map.serialize_entry(&format!("color{}", i), color)?;
        }
        map.end()
    }
}

pub fn json(palette: &Palette) -> Result<String> {
    let doc = ColorsJson {
        wallpaper: &palette.wallpaper,
        alpha: palette.alpha.to_string(),
        special: Special {
            background: palette.background,
            foreground: palette.foreground,
            cursor: palette.cursor,
        },
        colors: NumberedColors(&palette.colors),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn shell(palette: &Palette) -> String {
    let mut out = String::from("# Shell variables\n# Generated by wal-e\n");
    let _ = writeln!(out, "wallpaper='{}'", palette.wallpaper.display());
    let _ = writeln!(out, "\n# Special");
    let _ = writeln!(out, "background='{}'", palette.background);
    let _ = writeln!(out, "foreground='{}'", palette.foreground);
    let _ = writeln!(out, "cursor='{}'", palette.cursor);
    let _ = writeln!(out, "\n# Colors");
    for (i, color) in palette.colors.iter().enumerate() {
        let _ = writeln!(out, "color{}='{}'", i, color);
    }
    out
}

pub fn plain(palette: &Palette) -> String {
    palette.colors.iter().map(|c| format!("{}\n", c)).collect()
}

pub fn xresources(palette: &Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "*foreground: {}", palette.foreground);
    let _ = writeln!(out, "*background: {}", palette.background);
    let _ = writeln!(out, "*cursorColor: {}", palette.cursor);
    let _ = writeln!(out, "URxvt*background: [{}]{}", palette.alpha, palette.background);
    for (i, color) in palette.colors.iter().enumerate() {
        let _ = writeln!(out, "*color{}: {}", i, color);
    }
    out
}

pub fn every(palette: &Palette, cache_dir: &Path) -> Result<()> {
    fs::create_dir_all(cache_dir)?;

    let files = [
        ("colors.json", json(palette)?),
        ("colors.sh", shell(palette)),
        ("colors", plain(palette)),
        ("colors.Xresources", xresources(palette)),
    ];
    for (name, content) in files {
        let path = cache_dir.join(name);
        fs::write(&path, content)?;
        debug!("exported {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::tests::sample_palette;

    #[test]
    fn test_json_layout() {
        let mut palette = sample_palette();
        palette.alpha = 50;
        let parsed: serde_json::Value = serde_json::from_str(&json(&palette).unwrap()).unwrap();

        assert_eq!(parsed["alpha"], "50");
        assert_eq!(parsed["wallpaper"], "/pics/wallpapers/42_800x600.jpg");
        assert_eq!(parsed["special"]["background"], palette.background.to_string());
        assert_eq!(parsed["colors"]["color15"], palette.colors[15].to_string());
    }

    #[test]
    fn test_json_colors_in_numeric_order() {
        let out = json(&sample_palette()).unwrap();
        let c2 = out.find("\"color2\"").unwrap();
        let c10 = out.find("\"color10\"").unwrap();
        assert!(c2 < c10);
    }

    #[test]
    fn test_shell_and_plain() {
        let palette = sample_palette();
        let sh = shell(&palette);
        assert!(sh.contains(&format!("color3='{}'", palette.colors[3])));
        assert!(sh.contains("wallpaper='/pics/wallpapers/42_800x600.jpg'"));
        assert_eq!(plain(&palette).lines().count(), 16);
    }

    #[test]
    fn test_every_writes_all_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("wal");
        every(&sample_palette(), &dir).unwrap();

        for name in ["colors.json", "colors.sh", "colors", "colors.Xresources"] {
            assert!(dir.join(name).is_file(), "{} missing", name);
        }
    }
}
