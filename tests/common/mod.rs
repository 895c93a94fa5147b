//! 測試共用的 fixture

use std::fs;
use std::path::{Path, PathBuf};

/// 產生只含 EXIF `DateTimeOriginal` 的最小 JPEG
pub fn jpeg_with_capture_time(capture_time: &str) -> Vec<u8> {
    let mut date = capture_time.as_bytes().to_vec();
    date.push(0);
    assert_eq!(date.len(), 20, "EXIF 日期必須為 19 字元");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II\x2a\x00");
    tiff.extend_from_slice(&8u32.to_le_bytes());
    // IFD0 -> Exif IFD (offset 26)
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&26u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    // Exif IFD -> DateTimeOriginal (offset 44)
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9003u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&20u32.to_le_bytes());
    tiff.extend_from_slice(&44u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&date);

    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend_from_slice(&tiff);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = u16::try_from(app1.len() + 2).unwrap();
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(&app1);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

/// 建立 source/ 與 dest/ 兩個路徑（dest 尚未建立）
pub fn source_and_destination(root: &Path) -> (PathBuf, PathBuf) {
    let source = root.join("source");
    let destination = root.join("dest");
    fs::create_dir_all(&source).unwrap();
    (source, destination)
}

/// 以相對路徑列出資料夾下所有檔案，已排序
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
