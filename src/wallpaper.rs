// ============================================================================
// Wallpaper Workflow
// ============================================================================
// resolution -> image (cache or network) -> save -> metadata -> theme

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::cache::WallpaperCache;
use crate::error::Result;
use crate::picsum::{ImageRecord, ImageRequest, Metadata, PhotoService};
use crate::theme::{self, Themer};
use crate::xrandr::{self, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Let the service pick; always hits the network.
    Random,
    ById(u32),
}

#[derive(Debug, Clone)]
pub struct Request {
    pub mode: Mode,
    /// `WIDTHxHEIGHT` override, otherwise xrandr is asked.
    pub resolution: Option<String>,
}

#[derive(Debug)]
pub struct Outcome {
    pub id: u32,
    pub resolution: Resolution,
    pub path: PathBuf,
    pub metadata: Option<Metadata>,
}

/// Random always fetches. A known id is served from the cache when the
/// exact (width, height, id) file exists.
pub fn acquire(
    service: &dyn PhotoService,
    cache: &WallpaperCache,
    resolution: Resolution,
    mode: Mode,
) -> Result<ImageRecord> {
    let Resolution { width, height } = resolution;
    match mode {
        Mode::Random => service.fetch_image(&ImageRequest::random(width, height)),
        Mode::ById(id) => match cache.load(width, height, id)? {
            Some(cached) => Ok(cached),
            None => service.fetch_image(&ImageRequest::by_id(id, width, height)),
        },
    }
}

/// The whole invocation. `themer` is `None` when theming is switched off.
pub fn run(
    request: &Request,
    service: &dyn PhotoService,
    cache: &WallpaperCache,
    themer: Option<&dyn Themer>,
) -> Result<Outcome> {
    let resolution = xrandr::get_resolution(request.resolution.as_deref())?;
    info!("Using resolution {}", resolution);

    let image = acquire(service, cache, resolution, request.mode)?;
    let id = image.id;
    let path = cache.save(&image, resolution.width, resolution.height, id)?;
    info!("Wallpaper {} at {}", id, path.display());

    let metadata = match service.fetch_metadata(id) {
        Ok(metadata) => {
            info!("{}", metadata);
            debug!("page {} download {}", metadata.url, metadata.download_url);
            Some(metadata)
        }
        Err(e) => {
            warn!("Could not fetch info for image {}: {}", id, e);
            None
        }
    };

    if let Some(themer) = themer {
        theme::apply(themer, &path)?;
    }

    Ok(Outcome {
        id,
        resolution,
        path,
        metadata,
    })
}
