use image::{Rgba, RgbaImage};
use rose_platform::PhysicalSize;
use violette::texture::{SampleMode, Texture, TextureWrap};

use crate::tests::IntegrationTest;

fn gradient() -> RgbaImage {
    RgbaImage::from_fn(16, 8, |x, y| Rgba([(x * 16) as u8, (y * 32) as u8, 128, 255]))
}

fn test_upload_download(_: PhysicalSize<f32>) {
    let img = gradient();
    let texture = Texture::from_image(&img).unwrap();
    assert_eq!(texture.size(), (16, 8));
    assert_eq!(texture.download_rgba().unwrap(), img.as_raw().as_slice());
}

fn test_mipmaps_keep_base_level(_: PhysicalSize<f32>) {
    let img = rose_core::assets::checkerboard(4, 4, 255, 0);
    let texture = Texture::from_image(&img).unwrap();
    texture.set_wrap(TextureWrap::Repeat).unwrap();
    texture
        .set_filter(SampleMode::LinearMipmapLinear, SampleMode::Linear)
        .unwrap();
    texture.generate_mipmaps().unwrap();
    assert_eq!(texture.download_rgba().unwrap(), img.as_raw().as_slice());
}

fn test_update_bgra(_: PhysicalSize<f32>) {
    let texture = Texture::new(2, 1).unwrap();
    texture.update_bgra(&[1, 2, 3, 255, 10, 20, 30, 255]).unwrap();
    assert_eq!(
        texture.download_rgba().unwrap(),
        [3, 2, 1, 255, 30, 20, 10, 255]
    );
}

inventory::submit!(IntegrationTest {
    name: "Texture upload/download",
    test_fn: test_upload_download,
});

inventory::submit!(IntegrationTest {
    name: "Texture mipmaps keep base level",
    test_fn: test_mipmaps_keep_base_level,
});

inventory::submit!(IntegrationTest {
    name: "Texture BGRA update",
    test_fn: test_update_bgra,
});
