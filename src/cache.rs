// ============================================================================
// Local Wallpaper Cache
// ============================================================================
// One file per (width, height, id): <dir>/<id>_<width>x<height>.jpg
// Entries are never overwritten or removed.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::picsum::ImageRecord;

pub struct WallpaperCache {
    dir: PathBuf,
}

impl WallpaperCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        WallpaperCache { dir: dir.into() }
    }

    pub fn path_for(&self, width: u32, height: u32, id: u32) -> PathBuf {
        self.dir.join(format!("{}_{}x{}.jpg", id, width, height))
    }

    /// `Ok(None)` when nothing is cached for the triple.
    pub fn load(&self, width: u32, height: u32, id: u32) -> Result<Option<ImageRecord>> {
        let path = self.path_for(width, height, id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!("cache hit {}", path.display());
        ImageRecord::new(id, width, height, bytes).map(Some)
    }

    /// Writes the image unless a file already sits at its path.
    pub fn save(&self, image: &ImageRecord, width: u32, height: u32, id: u32) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(width, height, id);
        if path.exists() {
            debug!("{} already cached", path.display());
            return Ok(path);
        }

        // Staged next to the target and moved into place; readers never see
        // a partial entry.
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(image.bytes())?;
        staged.as_file().sync_all()?;

        match staged.persist_noclobber(&path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                debug!("{} cached concurrently", path.display());
                return Ok(path);
            }
            Err(e) => return Err(e.error.into()),
        }

        debug!("saved {} ({:?}, {} bytes)", path.display(), image.format, image.bytes().len());
        Ok(path)
    }
}
