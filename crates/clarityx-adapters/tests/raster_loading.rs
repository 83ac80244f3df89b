//! Integration tests for raster image loading.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use clarityx_adapters::FsImageSource;
use clarityx_core::{ImageInfo, ImageSource};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

fn write_fixture(dir: &Path, name: &str, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([200, 40, 40])))
        .save_with_format(&path, format)
        .unwrap();
    path
}

fn fixtures() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "test.jpg", ImageFormat::Jpeg);
    write_fixture(dir.path(), "test.png", ImageFormat::Png);
    write_fixture(dir.path(), "test.bmp", ImageFormat::Bmp);
    write_fixture(dir.path(), "test.tiff", ImageFormat::Tiff);
    dir
}

fn load_single(path: PathBuf) -> ImageInfo {
    let source = FsImageSource::new(vec![path], false);

    let images: Vec<_> = source.images().collect();
    assert_eq!(images.len(), 1);
    images.into_iter().next().unwrap().expect("should load")
}

#[test]
fn test_load_jpeg() {
    let dir = fixtures();
    let info = load_single(dir.path().join("test.jpg"));
    assert_eq!(info.width, 8);
    assert_eq!(info.height, 8);
    assert!(info.path.ends_with("test.jpg"));
}

#[test]
fn test_load_png() {
    let dir = fixtures();
    let info = load_single(dir.path().join("test.png"));
    assert_eq!((info.width, info.height), (8, 8));
    assert!(info.path.ends_with("test.png"));
}

#[test]
fn test_load_bmp_and_tiff() {
    let dir = fixtures();
    for name in ["test.bmp", "test.tiff"] {
        let info = load_single(dir.path().join(name));
        assert_eq!((info.width, info.height), (8, 8), "{name}");
    }
}

#[test]
fn test_load_directory() {
    let dir = fixtures();
    std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();
    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);

    let images: Vec<_> = source.images().collect();
    assert_eq!(images.len(), 4);
    for result in images {
        let info = result.expect("all fixtures should load");
        assert_eq!(info.width, 8);
    }
}

#[test]
fn test_count_hint() {
    let dir = fixtures();
    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);

    assert_eq!(source.count_hint(), Some(4));
}

#[test]
fn test_corrupt_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\ntruncated").unwrap();

    let source = FsImageSource::new(vec![path], false);
    let entries = source.entries();
    assert_eq!(entries.len(), 1);

    let err = source.load(&entries[0]).expect_err("corrupt PNG must not decode");
    assert!(err.path.ends_with("broken.png"));
    assert!(err.to_string().contains("broken.png"));
}

#[test]
fn test_missing_path_is_ignored() {
    let source = FsImageSource::new(vec![PathBuf::from("/no/such/dir")], true);
    assert!(source.entries().is_empty());
}
