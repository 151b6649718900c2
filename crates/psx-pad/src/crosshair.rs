//! Crosshair images drawn by frontends in place of the host mouse pointer.

use std::path::Path;

use image::{Rgba, RgbaImage};

const BUILTIN_SIZE: u32 = 32;
const BUILTIN_ARM: u32 = 2;
const BUILTIN_GAP: u32 = 4;

/// Crosshair used when no image is configured, or the configured one cannot be loaded.
///
/// A white cross with a one pixel black outline and an empty centre, so the aimed-at pixel stays
/// visible.
pub fn builtin_crosshair() -> RgbaImage {
    let white = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
    let black = Rgba([0x00, 0x00, 0x00, 0xFF]);
    let centre = BUILTIN_SIZE / 2;

    let in_cross = |x: u32, y: u32| {
        let near_h = y.abs_diff(centre) < BUILTIN_ARM;
        let near_v = x.abs_diff(centre) < BUILTIN_ARM;
        let in_gap = x.abs_diff(centre) < BUILTIN_GAP && y.abs_diff(centre) < BUILTIN_GAP;
        (near_h || near_v) && !in_gap
    };

    let mut img = RgbaImage::new(BUILTIN_SIZE, BUILTIN_SIZE);
    for y in 0..BUILTIN_SIZE {
        for x in 0..BUILTIN_SIZE {
            if in_cross(x, y) {
                img.put_pixel(x, y, white);
            }
        }
    }

    // Outline every transparent pixel that touches the cross.
    let cross = img.clone();
    for y in 0..BUILTIN_SIZE {
        for x in 0..BUILTIN_SIZE {
            if cross.get_pixel(x, y)[3] != 0 {
                continue;
            }
            let touches = [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)].iter().any(|&(dx, dy)| {
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                nx >= 0
                    && ny >= 0
                    && (nx as u32) < BUILTIN_SIZE
                    && (ny as u32) < BUILTIN_SIZE
                    && cross.get_pixel(nx as u32, ny as u32)[3] != 0
            });
            if touches {
                img.put_pixel(x, y, black);
            }
        }
    }
    img
}

/// Loads a crosshair image from disk, converting it to RGBA8.
pub fn load_crosshair(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(img) => Some(img.into_rgba8()),
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to load crosshair image: {err}");
            None
        }
    }
}

/// Resolves the configured crosshair path; an empty path selects the built-in image.
pub fn resolve_crosshair(path: &str) -> RgbaImage {
    if path.is_empty() {
        return builtin_crosshair();
    }
    load_crosshair(Path::new(path)).unwrap_or_else(builtin_crosshair)
}
