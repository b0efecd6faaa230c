//! Asset loading from `assets/` with generated fallbacks for missing files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Context, Result};
use image::{GrayImage, Rgba, RgbaImage};
use violette::texture::{SampleMode, Texture, TextureWrap};

use crate::{
    sprite::SpriteSheet,
    terrain::{Heightmap, HEIGHTMAP_SIZE},
};

pub const ASSETS_DIR: &str = "assets";

pub const PHONG_VERT: &str = include_str!("shaders/phong.vert.glsl");
pub const PHONG_FRAG: &str = include_str!("shaders/phong.frag.glsl");

pub fn asset_path(relative: impl AsRef<Path>) -> PathBuf {
    Path::new(ASSETS_DIR).join(relative)
}

pub fn shader_path(name: &str) -> PathBuf {
    asset_path("shaders").join(name)
}

pub fn texture_path(name: &str) -> PathBuf {
    asset_path("textures").join(name)
}

/// Square checkerboard of `cells` x `cells` cells, each `cell` pixels wide.
pub fn checkerboard(cells: u32, cell: u32, light: u8, dark: u8) -> RgbaImage {
    let size = cells * cell;
    RgbaImage::from_fn(size, size, |x, y| {
        let v = if (x / cell + y / cell) % 2 == 0 {
            light
        } else {
            dark
        };
        Rgba([v, v, v, 255])
    })
}

/// Decode an image, or build `fallback` with a warning if it cannot be read.
pub fn load_image_or(path: impl AsRef<Path>, fallback: impl FnOnce() -> RgbaImage) -> RgbaImage {
    let path = path.as_ref();
    match image::open(path) {
        Ok(image) => {
            tracing::debug!(path = %path.display(), "Loaded image");
            image.into_rgba8()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "Texture not found, using fallback");
            fallback()
        }
    }
}

/// Repeat-wrapped, mipmapped texture; a 2x2 grey checker when the file is missing.
pub fn load_texture_or_checker(path: impl AsRef<Path>) -> Result<Texture> {
    let image = load_image_or(path, || checkerboard(2, 1, 255, 170));
    let texture = Texture::from_image(&image).context("Cannot upload texture")?;
    texture.set_wrap(TextureWrap::Repeat)?;
    texture.set_filter(SampleMode::LinearMipmapLinear, SampleMode::Linear)?;
    texture.generate_mipmaps()?;
    Ok(texture)
}

/// A sheet laid out like `sheet` with one flat colour per frame and transparent gaps.
pub fn generated_sprite_sheet(sheet: &SpriteSheet) -> RgbaImage {
    const COLORS: [[u8; 3]; 8] = [
        [230, 80, 80],
        [240, 170, 60],
        [230, 220, 80],
        [100, 200, 90],
        [80, 190, 210],
        [90, 120, 230],
        [170, 100, 220],
        [220, 110, 170],
    ];
    let size = sheet.size();
    let stride = (sheet.frame_size.x + sheet.gap) as u32;
    let (frame_w, frame_h) = (sheet.frame_size.x as u32, sheet.frame_size.y as u32);
    RgbaImage::from_fn(size.x as u32, size.y as u32, |x, y| {
        let (col, row) = (x / stride, y / frame_h);
        if x % stride >= frame_w || col >= sheet.columns || row >= sheet.rows {
            return Rgba([0, 0, 0, 0]);
        }
        let [r, g, b] = COLORS[((col + row * sheet.columns) as usize) % COLORS.len()];
        Rgba([r, g, b, 255])
    })
}

/// Rolling hills used when no heightmap image is available.
pub fn procedural_heightmap(size: usize) -> Heightmap {
    Heightmap::from_fn(size, |x, z| {
        let (u, v) = (x as f32 / size as f32, z as f32 / size as f32);
        let hills = (u * 9.).sin() * (v * 7.).cos() * 0.25;
        let ripples = ((u + v) * 23.).sin() * 0.05;
        0.5 + hills + ripples
    })
}

pub fn load_heightmap(path: impl AsRef<Path>) -> Heightmap {
    let path = path.as_ref();
    match image::open(path) {
        Ok(image) => Heightmap::from_luma(&image.into_luma8()),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "Heightmap not found, generating one");
            procedural_heightmap(HEIGHTMAP_SIZE as usize)
        }
    }
}

/// Write the default sources to `vertex` and `fragment` when either file is missing.
/// Returns whether files were written.
pub fn ensure_shader_files(
    vertex: impl AsRef<Path>,
    fragment: impl AsRef<Path>,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<bool> {
    let (vertex, fragment) = (vertex.as_ref(), fragment.as_ref());
    if vertex.exists() && fragment.exists() {
        return Ok(false);
    }
    for (path, source) in [(vertex, vertex_source), (fragment, fragment_source)] {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }
        fs::write(path, source).with_context(|| format!("Cannot write {}", path.display()))?;
    }
    tracing::info!(vertex = %vertex.display(), fragment = %fragment.display(), "Wrote default shaders");
    Ok(true)
}

/// Luma view of a heightmap, used to save generated maps.
pub fn heightmap_image(map: &Heightmap) -> GrayImage {
    let size = map.size() as u32;
    GrayImage::from_fn(size, size, |x, z| {
        image::Luma([(map.height(x as usize, z as usize) * 255.).round() as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rose-core-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn checker_fallback() {
        let image = checkerboard(2, 1, 255, 170);
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([170, 170, 170, 255]));
        assert_eq!(image.get_pixel(0, 1), &Rgba([170, 170, 170, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn missing_image_uses_fallback() {
        let image = load_image_or("does/not/exist.png", || checkerboard(4, 8, 200, 50));
        assert_eq!(image.dimensions(), (32, 32));
    }

    #[test]
    fn sprite_sheet_fallback_layout() {
        let sheet = SpriteSheet::CHARACTER;
        let image = generated_sprite_sheet(&sheet);
        assert_eq!(image.dimensions(), (436, 256));
        // Gap between the first two columns is transparent.
        assert_eq!(image.get_pixel(70, 10)[3], 0);
        assert_ne!(image.get_pixel(10, 10), image.get_pixel(130, 10));
        assert_ne!(image.get_pixel(10, 10), image.get_pixel(10, 200));
        assert_eq!(image.get_pixel(435, 255)[3], 255);
    }

    #[test]
    fn heightmap_fallback_and_roundtrip() {
        let map = load_heightmap("does/not/exist.png");
        assert_eq!(map.size(), HEIGHTMAP_SIZE as usize);

        let dir = scratch_dir("heightmap");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("heightmap.png");
        heightmap_image(&map).save(&path).unwrap();
        let loaded = load_heightmap(&path);
        assert!((loaded.height(40, 70) - map.height(40, 70)).abs() <= 1. / 255.);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn default_shaders_written_once() {
        let dir = scratch_dir("shaders");
        let (vert, frag) = (dir.join("phong.vert.glsl"), dir.join("phong.frag.glsl"));
        assert!(ensure_shader_files(&vert, &frag, PHONG_VERT, PHONG_FRAG).unwrap());
        assert_eq!(fs::read_to_string(&frag).unwrap(), PHONG_FRAG);

        fs::write(&vert, "// edited").unwrap();
        assert!(!ensure_shader_files(&vert, &frag, PHONG_VERT, PHONG_FRAG).unwrap());
        assert_eq!(fs::read_to_string(&vert).unwrap(), "// edited");
        fs::remove_dir_all(dir).unwrap();
    }
}
