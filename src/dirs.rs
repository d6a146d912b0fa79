// ============================================================================
// dirs module
// ============================================================================
// Pictures base comes from XDG_PICTURES_DIR, theme files follow pywal's
// layout under XDG_CACHE_HOME.

use std::env;
use std::path::PathBuf;

use log::warn;

pub const PICTURES_ENV: &str = "XDG_PICTURES_DIR";
pub const WALLPAPER_SUBDIR: &str = "wallpapers";

/// Base directory for pictures. Falls back to the current directory.
pub fn picture_dir() -> PathBuf {
    picture_dir_from(env::var_os(PICTURES_ENV).map(PathBuf::from))
}

fn picture_dir_from(value: Option<PathBuf>) -> PathBuf {
    match value {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => {
            warn!("Couldn't get default folder for pictures. Using current folder as base.");
            PathBuf::from(".")
        }
    }
}

pub fn wallpaper_dir() -> PathBuf {
    picture_dir().join(WALLPAPER_SUBDIR)
}

/// Where the exported color scheme lives (`~/.cache/wal`).
pub fn theme_cache_dir() -> PathBuf {
    let cache = env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .unwrap_or_else(|| PathBuf::from(".cache"));
    cache.join("wal")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_dir_uses_value() {
        let dir = picture_dir_from(Some(PathBuf::from("/home/user/Pictures")));
        assert_eq!(dir, PathBuf::from("/home/user/Pictures"));
    }

    #[test]
    fn test_picture_dir_falls_back_to_cwd() {
        assert_eq!(picture_dir_from(None), PathBuf::from("."));
        assert_eq!(picture_dir_from(Some(PathBuf::new())), PathBuf::from("."));
    }
}
