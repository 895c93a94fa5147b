use crate::config::is_image_file;
use crate::tools::validate_directory_exists;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 待整理的圖片檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

/// 掃描資料夾第一層的圖片檔案（不含子資料夾），依檔名排序
///
/// 符號連結依其指向的檔案判斷，壞掉的連結會被略過。
pub fn scan_image_files(directory: &Path) -> Result<Vec<ImageFile>> {
    validate_directory_exists(directory)?;

    let files = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_image_file(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            Some(ImageFile {
                path: entry.into_path(),
                file_name,
                size: metadata.len(),
            })
        })
        .collect();

    Ok(files)
}
