use std::io::Cursor;

use super::*;

fn encode_png(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();
    let buf = encode_png(image::DynamicImage::ImageRgba8(img));

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn decode_frame_luma_replicates_channels_and_resizes() {
    let img = image::GrayImage::from_pixel(4, 4, image::Luma([90u8]));
    let buf = encode_png(image::DynamicImage::ImageLuma8(img));

    let same = decode_frame_luma(&buf, 4, 4).unwrap();
    assert_eq!(same.len(), 4 * 4 * 4);
    assert_eq!(&same[..4], &[90, 90, 90, 255]);

    let resized = decode_frame_luma(&buf, 2, 2).unwrap();
    assert_eq!(resized.len(), 2 * 2 * 4);
    assert_eq!(&resized[..4], &[90, 90, 90, 255]);
}
