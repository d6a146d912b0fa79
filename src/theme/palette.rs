// ============================================================================
// Palette Extraction
// ============================================================================
// Median cut over a thumbnail, then pywal's dark-theme adjustment.

use std::path::Path;

use image::{DynamicImage, GenericImageView};

use super::{Palette, Rgb};
use crate::error::{Error, Result};

const SAMPLE_SIZE: u32 = 200;
const RAW_COLORS: usize = 16;

/// Decodes by content, not by extension.
pub fn from_file(path: &Path) -> Result<Palette> {
    let img = image::io::Reader::open(path)?.with_guessed_format()?.decode()?;
    let colors = from_image(&img)?;
    Ok(Palette {
        wallpaper: path.to_path_buf(),
        alpha: 100,
        background: colors[0],
        foreground: colors[15],
        cursor: colors[15],
        colors,
    })
}

pub fn from_image(img: &DynamicImage) -> Result<[Rgb; 16]> {
    let raw = quantize(img, RAW_COLORS)?;
    Ok(adjust(&raw))
}

/// Median cut down to `count` colors, darkest first.
fn quantize(img: &DynamicImage, count: usize) -> Result<Vec<Rgb>> {
    let thumb = if img.width() > SAMPLE_SIZE || img.height() > SAMPLE_SIZE {
        img.thumbnail(SAMPLE_SIZE, SAMPLE_SIZE).to_rgb8()
    } else {
        img.to_rgb8()
    };
    let pixels: Vec<Rgb> = thumb.pixels().map(|p| Rgb(p[0], p[1], p[2])).collect();
    if pixels.is_empty() {
        return Err(Error::Parse("image has no pixels".to_string()));
    }

    let mut buckets = vec![pixels];
    while buckets.len() < count {
        let Some(index) = widest_bucket(&buckets) else {
            break;
        };
        let mut bucket = buckets.swap_remove(index);
        let channel = widest_channel(&bucket);
        bucket.sort_unstable_by_key(|c| channel_value(*c, channel));
        let upper = bucket.split_off(bucket.len() / 2);
        buckets.push(bucket);
        buckets.push(upper);
    }

    let mut colors: Vec<Rgb> = buckets.iter().map(|b| average(b)).collect();
    // Tiny images can run out of pixels to split.
    let mut i = 0;
    while colors.len() < count {
        colors.push(colors[i]);
        i += 1;
    }
    colors.sort_by(|a, b| a.luminance().total_cmp(&b.luminance()));
    Ok(colors)
}

fn widest_bucket(buckets: &[Vec<Rgb>]) -> Option<usize> {
    buckets
        .iter()
        .enumerate()
        .filter(|(_, b)| b.len() > 1)
        .max_by_key(|(_, b)| channel_range(b, widest_channel(b)))
        .map(|(i, _)| i)
}

fn channel_value(c: Rgb, channel: usize) -> u8 {
    match channel {
        0 => c.0,
        1 => c.1,
        _ => c.2,
    }
}

fn channel_range(bucket: &[Rgb], channel: usize) -> u8 {
    let values = bucket.iter().map(|c| channel_value(*c, channel));
    let max = values.clone().max().unwrap_or(0);
    let min = values.min().unwrap_or(0);
    max - min
}

fn widest_channel(bucket: &[Rgb]) -> usize {
    (0..3).max_by_key(|ch| channel_range(bucket, *ch)).unwrap_or(0)
}

fn average(bucket: &[Rgb]) -> Rgb {
    let n = bucket.len().max(1) as u32;
    let (r, g, b) = bucket.iter().fold((0u32, 0u32, 0u32), |(r, g, b), c| {
        (r + c.0 as u32, g + c.1 as u32, b + c.2 as u32)
    });
    Rgb((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

/// Darkest color as background, the 8 brightest as normal colors and
/// again as brights, then the usual contrast tweaks.
fn adjust(raw: &[Rgb]) -> [Rgb; 16] {
    let mut colors = [raw[0]; 16];
    colors[1..9].copy_from_slice(&raw[8..16]);
    colors[9..16].copy_from_slice(&raw[8..15]);

    let light_grey = Rgb(0xEE, 0xEE, 0xEE);
    colors[0] = colors[0].darken(0.8);
    colors[7] = colors[7].blend(light_grey);
    colors[8] = colors[7].darken(0.3);
    colors[15] = colors[15].blend(light_grey);
    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb as Pixel};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let buf = ImageBuffer::from_fn(width, height, |x, y| {
            Pixel([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
        });
        DynamicImage::ImageRgb8(buf)
    }

    #[test]
    fn test_sixteen_colors_from_gradient() {
        let colors = from_image(&gradient(64, 48)).unwrap();
        assert_eq!(colors.len(), 16);
        // background darker than foreground on a dark scheme
        assert!(colors[0].luminance() < colors[15].luminance());
    }

    #[test]
    fn test_quantize_sorted_by_luminance() {
        let colors = quantize(&gradient(32, 32), 16).unwrap();
        assert_eq!(colors.len(), 16);
        for pair in colors.windows(2) {
            assert!(pair[0].luminance() <= pair[1].luminance());
        }
    }

    #[test]
    fn test_single_pixel_image() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(1, 1, Pixel([200, 100, 50])));
        let colors = from_image(&img).unwrap();
        assert_eq!(colors[1], Rgb(200, 100, 50));
        assert_eq!(colors[0], Rgb(200, 100, 50).darken(0.8));
    }

    #[test]
    fn test_adjust_layout() {
        let raw: Vec<Rgb> = (0..16).map(|i| Rgb(i * 10, i * 10, i * 10)).collect();
        let colors = adjust(&raw);
        assert_eq!(colors[1], raw[8]);
        assert_eq!(colors[9], raw[8]);
        assert_eq!(colors[14], raw[13]);
        assert_eq!(colors[8], colors[7].darken(0.3));
    }

    #[test]
    fn test_from_file_png_named_jpg() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("7_40x30.jpg");
        gradient(40, 30).save_with_format(&path, image::ImageFormat::Png).unwrap();

        let palette = from_file(&path).unwrap();
        assert_eq!(palette.wallpaper, path);
        assert_eq!(palette.background, palette.colors[0]);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(from_file(Path::new("/nonexistent/wal-e/none.jpg")).is_err());
    }
}
