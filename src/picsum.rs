// ============================================================================
// Picsum Photos API Integration
// ============================================================================
// Base URL: https://picsum.photos
// API Key: NOT required
// Random images redirect to /id/{id}/{width}/{height}, which is the only
// place the chosen id shows up.
// ============================================================================

use std::fmt;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageOutputFormat};
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

pub const BASE_URL: &str = "https://picsum.photos";

// ============================================================================
// Default API Parameters
// ============================================================================
// Parameters equal to the service defaults are left out of the query.
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 30;
pub const MAX_BLUR: u32 = 10;

/// Used when a non-JPEG response has to be re-encoded for the cache.
const JPEG_QUALITY: u8 = 90;

// ============================================================================
// API Response Structures
// ============================================================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: u32,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub download_url: String,
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{}) {}", self.id, self.width, self.height, self.author)
    }
}

// The service sends ids as strings ("id": "237").
fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u32),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Image Record
// ============================================================================
/// Encoded image bytes plus the (width, height, id) they were stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    /// Always `Jpeg` once constructed.
    pub format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageRecord {
    /// Fails with `Error::Parse` unless the bytes start like a known image format.
    /// Anything that is not already JPEG is decoded and re-encoded as JPEG, so
    /// the bytes always match the `.jpg` name the cache stores them under.
    pub fn new(id: u32, width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&bytes)
            .map_err(|e| Error::Parse(format!("image {} is not valid image data: {}", id, e)))?;
        let bytes = match format {
            ImageFormat::Jpeg => bytes,
            other => {
                debug!("re-encoding image {} from {:?} to JPEG", id, other);
                to_jpeg(id, &bytes)?
            }
        };
        Ok(ImageRecord {
            id,
            width,
            height,
            format: ImageFormat::Jpeg,
            bytes,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn to_jpeg(id: u32, bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::Parse(format!("image {} could not be decoded: {}", id, e)))?;
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
    Ok(out.into_inner())
}

// ============================================================================
// Requests
// ============================================================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub width: u32,
    pub height: u32,
    pub id: Option<u32>,
    pub grayscale: bool,
    pub blur: u32,
}

impl ImageRequest {
    /// Let the service pick the image.
    pub fn random(width: u32, height: u32) -> Self {
        ImageRequest {
            width,
            height,
            id: None,
            grayscale: false,
            blur: 0,
        }
    }

    pub fn by_id(id: u32, width: u32, height: u32) -> Self {
        ImageRequest {
            id: Some(id),
            ..Self::random(width, height)
        }
    }

    pub fn path(&self) -> String {
        match self.id {
            Some(id) => format!("/id/{}/{}/{}", id, self.width, self.height),
            None => format!("/{}/{}", self.width, self.height),
        }
    }

    pub fn query(&self) -> Query {
        build_query(self.grayscale, self.blur, DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

pub fn info_path(id: u32) -> String {
    format!("/id/{}/info", id)
}

pub const LIST_PATH: &str = "/v2/list";

/// A rendered query string. `clamped_blur` keeps the caller's blur value
/// when it had to be cut down to `MAX_BLUR`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<String>,
    pub clamped_blur: Option<u32>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.params.join("&"))
    }
}

pub fn build_query(grayscale: bool, blur: u32, page: u32, limit: u32) -> Query {
    let mut query = Query::default();

    if grayscale {
        query.params.push("grayscale".to_string());
    }
    if blur > 0 {
        let mut blur = blur;
        if blur > MAX_BLUR {
            query.clamped_blur = Some(blur);
            blur = MAX_BLUR;
        }
        query.params.push(format!("blur={}", blur));
    }
    if page != DEFAULT_PAGE {
        query.params.push(format!("page={}", page));
    }
    if limit != DEFAULT_LIMIT {
        query.params.push(format!("limit={}", limit));
    }
    query
}

pub fn blur_warning(query: &Query) -> Option<String> {
    query.clamped_blur.map(|requested| {
        format!("Blur value cannot exceed {} (got {}), using {}", MAX_BLUR, requested, MAX_BLUR)
    })
}

/// Reads the id out of a `/id/{id}/...` location.
pub fn resolved_id(url: &Url) -> Option<u32> {
    let mut segments = url.path_segments()?;
    match segments.next() {
        Some("id") => segments.next()?.parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Service Seam
// ============================================================================
pub trait PhotoService {
    /// Returns the image together with the id it actually has.
    fn fetch_image(&self, request: &ImageRequest) -> Result<ImageRecord>;

    fn fetch_metadata(&self, id: u32) -> Result<Metadata>;

    /// One page of the catalogue, in service order.
    fn fetch_list(&self, page: u32, limit: u32) -> Result<Vec<Metadata>>;
}

// ============================================================================
// Blocking HTTP Client
// ============================================================================
pub struct Picsum {
    client: Client,
    base_url: String,
}

impl Picsum {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Talk to a picsum-compatible server somewhere else (mirrors, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("wal-e/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Picsum {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str, query: &Query) -> Result<Url> {
        let mut raw = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            raw.push('?');
            raw.push_str(&query.to_string());
        }
        Url::parse(&raw).map_err(|e| Error::Parse(format!("bad request url '{}': {}", raw, e)))
    }

    fn get_text(&self, url: Url, id: Option<u32>) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        if let (StatusCode::NOT_FOUND, Some(id)) = (response.status(), id) {
            return Err(Error::NotFound(id));
        }
        Ok(response.error_for_status()?.text()?)
    }
}

impl PhotoService for Picsum {
    fn fetch_image(&self, request: &ImageRequest) -> Result<ImageRecord> {
        let query = request.query();
        if let Some(message) = blur_warning(&query) {
            warn!("{}", message);
        }
        let url = self.url(&request.path(), &query)?;

        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        if let (StatusCode::NOT_FOUND, Some(id)) = (response.status(), request.id) {
            return Err(Error::NotFound(id));
        }
        let response = response.error_for_status()?;

        let id = match request.id {
            Some(id) => id,
            None => resolved_id(response.url()).ok_or_else(|| {
                Error::Parse(format!("no image id in redirect location {}", response.url()))
            })?,
        };

        let bytes = response.bytes()?.to_vec();
        debug!("received {} bytes for image {}", bytes.len(), id);
        ImageRecord::new(id, request.width, request.height, bytes)
    }

    fn fetch_metadata(&self, id: u32) -> Result<Metadata> {
        let url = self.url(&info_path(id), &Query::default())?;
        let body = self.get_text(url, Some(id))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn fetch_list(&self, page: u32, limit: u32) -> Result<Vec<Metadata>> {
        let query = build_query(false, 0, page, limit);
        let url = self.url(LIST_PATH, &query)?;
        let body = self.get_text(url, None)?;
        Ok(serde_json::from_str(&body)?)
    }
}
