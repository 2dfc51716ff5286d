use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use proptest::prelude::*;
use std::io::Cursor;

use meme_generator::meme::{compose, scaled_height, MemeError};

fn create_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 255) as u8, (y * 3 % 255) as u8, 128, 255])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .to_rgb8()
        .write_to(&mut cursor, ImageFormat::Jpeg)
        .expect("failed to encode test jpeg");
    cursor.into_inner()
}

proptest! {
    #[test]
    fn scaled_height_is_rounded_aspect_ratio(width in 1u32..5000, height in 1u32..5000) {
        let expected = (768.0 * height as f64 / width as f64).round().max(1.0) as u32;
        prop_assert_eq!(scaled_height(768, width, height), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn composed_output_has_canonical_dimensions(
        width in 16u32..400,
        height in 16u32..400,
        top in "[a-z !?]{0,12}",
        bottom in "[a-z0-9 ]{0,12}",
    ) {
        let png = compose(&create_jpeg_bytes(width, height), &top, &bottom).expect("compose");
        let out = image::load_from_memory(&png).expect("decode output");
        prop_assert_eq!(out.width(), 768);
        prop_assert_eq!(out.height(), scaled_height(768, width, height));
    }
}

#[test]
fn jpeg_source_roundtrips_to_png() {
    let png = compose(&create_jpeg_bytes(500, 375), "A", "B").expect("compose");
    assert_eq!(image::guess_format(&png).ok(), Some(ImageFormat::Png));
    let out = image::load_from_memory(&png).expect("decode output");
    assert_eq!((out.width(), out.height()), (768, 576));
}

#[test]
fn lowercase_and_uppercase_captions_render_identically() {
    let source = create_jpeg_bytes(300, 200);
    let lower = compose(&source, "hello", "there").expect("compose lower");
    let upper = compose(&source, "HELLO", "THERE").expect("compose upper");
    let decode = |bytes: &[u8]| image::load_from_memory(bytes).expect("decode").to_rgba8();
    assert_eq!(decode(&lower), decode(&upper));
}

#[test]
fn unreadable_source_is_a_decode_error() {
    let result = compose(b"\x89PNG\r\n\x1a\nnot really a png", "a", "b");
    assert!(matches!(result, Err(MemeError::Decode(_))));
}
