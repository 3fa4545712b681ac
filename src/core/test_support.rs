//! core/test_support.rs
//! Fixture builders shared by the unit tests.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use super::error::Result;
use super::tags::{audio_tags_from_tag, load_tag};
use super::types::AudioTags;

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, no padding, no CRC.
const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
/// 144 * 128000 / 44100, rounded down.
const FRAME_LEN: usize = 417;
const FRAME_COUNT: usize = 24;

/// Bytes of a tiny, silent, tag-less MP3 stream.
pub fn mp3_bytes() -> Vec<u8> {
    let mut out = Vec::with_capacity(FRAME_LEN * FRAME_COUNT);
    for _ in 0..FRAME_COUNT {
        out.extend_from_slice(&FRAME_HEADER);
        out.resize(out.len() + FRAME_LEN - FRAME_HEADER.len(), 0);
    }
    out
}

pub fn write_mp3(path: &Path) {
    std::fs::write(path, mp3_bytes()).unwrap();
}

/// Solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::write(path, png_bytes(width, height)).unwrap();
}

/// Tags as they are on disk now; an untagged file reads as all `None`.
pub fn read_audio_tags(path: PathBuf) -> Result<AudioTags> {
    match load_tag(&path)? {
        Some(tag) => Ok(audio_tags_from_tag(path, &tag)),
        None => Ok(AudioTags {
            path,
            ..AudioTags::default()
        }),
    }
}
