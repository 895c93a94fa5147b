use super::date_resolver::CaptureDate;
use crate::config::{ConflictPolicy, OperationMode};
use crate::tools::{copy_preserving_times, ensure_directory_exists, move_file};
use anyhow::{Context, Result};
use log::debug;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// 單一檔案的放置結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// 已複製或移動到此路徑
    Transferred(PathBuf),
    /// 目標已存在且依設定略過
    Skipped(PathBuf),
}

impl PlaceOutcome {
    #[must_use]
    pub fn destination(&self) -> &Path {
        match self {
            Self::Transferred(path) | Self::Skipped(path) => path,
        }
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// 計算 `<root>/<year>/<MM>-<MonthName>`
#[must_use]
pub fn destination_dir(destination_root: &Path, date: &CaptureDate) -> PathBuf {
    destination_root
        .join(date.year_folder())
        .join(date.month_folder())
}

/// 依拍攝日期把檔案放進年/月資料夾
#[derive(Debug, Clone)]
pub struct FilePlacer {
    destination_root: PathBuf,
    mode: OperationMode,
    conflict_policy: ConflictPolicy,
}

impl FilePlacer {
    pub fn new(
        destination_root: impl Into<PathBuf>,
        mode: OperationMode,
        conflict_policy: ConflictPolicy,
    ) -> Self {
        Self {
            destination_root: destination_root.into(),
            mode,
            conflict_policy,
        }
    }

    pub fn place(&self, source: &Path, date: &CaptureDate) -> Result<PlaceOutcome> {
        let target_dir = destination_dir(&self.destination_root, date);
        ensure_directory_exists(&target_dir)?;

        let file_name = source
            .file_name()
            .with_context(|| format!("無效的檔案路徑: {}", source.display()))?;
        let target = target_dir.join(file_name);

        if target.exists() {
            let same = same_file::is_same_file(source, &target).with_context(|| {
                format!("無法比對檔案: {} <-> {}", source.display(), target.display())
            })?;
            if same {
                return self.place_onto_same_file(source, target);
            }
            match self.conflict_policy {
                ConflictPolicy::Overwrite => {
                    debug!("覆蓋已存在的檔案: {}", target.display());
                }
                ConflictPolicy::Skip => {
                    debug!("跳過已存在的檔案: {}", target.display());
                    return Ok(PlaceOutcome::Skipped(target));
                }
                ConflictPolicy::Rename => {
                    let renamed = next_free_name(&target);
                    debug!("目標已存在，改名為: {}", renamed.display());
                    return self.transfer(source, renamed);
                }
            }
        }

        self.transfer(source, target)
    }

    fn transfer(&self, source: &Path, target: PathBuf) -> Result<PlaceOutcome> {
        match self.mode {
            OperationMode::Copy => copy_preserving_times(source, &target)?,
            OperationMode::Move => move_file(source, &target).with_context(|| {
                format!("移動檔案失敗: {} -> {}", source.display(), target.display())
            })?,
        }
        debug!("{}: {} -> {}", self.mode, source.display(), target.display());
        Ok(PlaceOutcome::Transferred(target))
    }

    /// 目標與來源是同一個檔案（同一路徑或硬連結）
    ///
    /// 複製會截斷共用的內容，rename 在兩個硬連結之間不做任何事，兩者都不能直接執行。
    fn place_onto_same_file(&self, source: &Path, target: PathBuf) -> Result<PlaceOutcome> {
        if is_same_path(source, &target) || self.mode == OperationMode::Copy {
            debug!("目標已是同一個檔案，略過: {}", target.display());
            return Ok(PlaceOutcome::Skipped(target));
        }

        // 目標已指向相同內容，只需移除來源的連結
        fs::remove_file(source)
            .with_context(|| format!("刪除原檔案失敗: {}", source.display()))?;
        debug!("移除硬連結來源: {} -> {}", source.display(), target.display());
        Ok(PlaceOutcome::Transferred(target))
    }
}

fn is_same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// 找出 `stem (n).ext` 形式中第一個不存在的檔名
fn next_free_name(target: &Path) -> PathBuf {
    let stem = target.file_stem().unwrap_or_default().to_string_lossy();
    let extension = target.extension().map(|ext| ext.to_string_lossy());

    (1..)
        .map(|n| {
            let mut name = OsString::from(format!("{stem} ({n})"));
            if let Some(ext) = &extension {
                name.push(format!(".{ext}"));
            }
            target.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| target.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::photo_organizer::date_resolver::DateSource;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn march_15() -> CaptureDate {
        CaptureDate::new(
            NaiveDate::from_ymd_opt(2023, 3, 15)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            DateSource::Metadata,
        )
    }

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("source");
        let dest_root = temp_dir.path().join("dest");
        fs::create_dir(&source_dir).unwrap();
        let source = source_dir.join("photo.jpg");
        fs::write(&source, b"new content").unwrap();
        (temp_dir, source, dest_root)
    }

    #[test]
    fn test_destination_dir_layout() {
        let dir = destination_dir(Path::new("/dest"), &march_15());
        assert_eq!(dir, Path::new("/dest").join("2023").join("03-March"));
    }

    #[test]
    fn test_copy_keeps_source() {
        let (_temp, source, dest_root) = setup();
        let placer = FilePlacer::new(&dest_root, OperationMode::Copy, ConflictPolicy::Overwrite);

        let outcome = placer.place(&source, &march_15()).unwrap();

        let expected = dest_root.join("2023/03-March/photo.jpg");
        assert_eq!(outcome, PlaceOutcome::Transferred(expected.clone()));
        assert!(source.exists());
        assert_eq!(fs::read(&source).unwrap(), fs::read(&expected).unwrap());
    }

    #[test]
    fn test_move_removes_source() {
        let (_temp, source, dest_root) = setup();
        let placer = FilePlacer::new(&dest_root, OperationMode::Move, ConflictPolicy::Overwrite);

        let outcome = placer.place(&source, &march_15()).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(outcome.destination()).unwrap(), b"new content");
    }

    #[test]
    fn test_existing_month_folder_is_reused() {
        let (_temp, source, dest_root) = setup();
        let month_dir = dest_root.join("2023/03-March");
        fs::create_dir_all(&month_dir).unwrap();
        fs::write(month_dir.join("other.jpg"), b"other").unwrap();

        let placer = FilePlacer::new(&dest_root, OperationMode::Copy, ConflictPolicy::Overwrite);
        placer.place(&source, &march_15()).unwrap();

        assert_eq!(fs::read(month_dir.join("other.jpg")).unwrap(), b"other");
        assert!(month_dir.join("photo.jpg").exists());
    }

    #[test]
    fn test_conflict_overwrite_replaces_content() {
        let (_temp, source, dest_root) = setup();
        let month_dir = dest_root.join("2023/03-March");
        fs::create_dir_all(&month_dir).unwrap();
        fs::write(month_dir.join("photo.jpg"), b"old content").unwrap();

        let placer = FilePlacer::new(&dest_root, OperationMode::Copy, ConflictPolicy::Overwrite);
        let outcome = placer.place(&source, &march_15()).unwrap();

        assert!(!outcome.is_skipped());
        assert_eq!(fs::read(month_dir.join("photo.jpg")).unwrap(), b"new content");
    }

    #[test]
    fn test_conflict_skip_keeps_existing() {
        let (_temp, source, dest_root) = setup();
        let month_dir = dest_root.join("2023/03-March");
        fs::create_dir_all(&month_dir).unwrap();
        fs::write(month_dir.join("photo.jpg"), b"old content").unwrap();

        let placer = FilePlacer::new(&dest_root, OperationMode::Move, ConflictPolicy::Skip);
        let outcome = placer.place(&source, &march_15()).unwrap();

        assert!(outcome.is_skipped());
        assert!(source.exists(), "略過時不應移動來源檔案");
        assert_eq!(fs::read(month_dir.join("photo.jpg")).unwrap(), b"old content");
    }

    #[test]
    fn test_conflict_rename_keeps_both() {
        let (_temp, source, dest_root) = setup();
        let month_dir = dest_root.join("2023/03-March");
        fs::create_dir_all(&month_dir).unwrap();
        fs::write(month_dir.join("photo.jpg"), b"old content").unwrap();
        fs::write(month_dir.join("photo (1).jpg"), b"older content").unwrap();

        let placer = FilePlacer::new(&dest_root, OperationMode::Copy, ConflictPolicy::Rename);
        let outcome = placer.place(&source, &march_15()).unwrap();

        assert_eq!(
            outcome,
            PlaceOutcome::Transferred(month_dir.join("photo (2).jpg"))
        );
        assert_eq!(fs::read(month_dir.join("photo.jpg")).unwrap(), b"old content");
        assert_eq!(fs::read(month_dir.join("photo (2).jpg")).unwrap(), b"new content");
    }

    #[test]
    fn test_source_already_in_place_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let dest_root = temp_dir.path().to_path_buf();
        let month_dir = dest_root.join("2023/03-March");
        fs::create_dir_all(&month_dir).unwrap();
        let source = month_dir.join("photo.jpg");
        fs::write(&source, b"content").unwrap();

        let placer = FilePlacer::new(&dest_root, OperationMode::Copy, ConflictPolicy::Overwrite);
        let outcome = placer.place(&source, &march_15()).unwrap();

        assert!(outcome.is_skipped());
        assert_eq!(fs::read(&source).unwrap(), b"content");
    }

    #[test]
    fn test_hard_linked_target_copy_keeps_source() {
        let (_temp, source, dest_root) = setup();
        let month_dir = dest_root.join("2023/03-March");
        fs::create_dir_all(&month_dir).unwrap();
        fs::hard_link(&source, month_dir.join("photo.jpg")).unwrap();

        let placer = FilePlacer::new(&dest_root, OperationMode::Copy, ConflictPolicy::Overwrite);
        let outcome = placer.place(&source, &march_15()).unwrap();

        assert!(outcome.is_skipped());
        assert_eq!(fs::read(&source).unwrap(), b"new content", "來源內容不應被截斷");
        assert_eq!(fs::read(month_dir.join("photo.jpg")).unwrap(), b"new content");
    }

    #[test]
    fn test_hard_linked_target_move_removes_source() {
        let (_temp, source, dest_root) = setup();
        let month_dir = dest_root.join("2023/03-March");
        fs::create_dir_all(&month_dir).unwrap();
        fs::hard_link(&source, month_dir.join("photo.jpg")).unwrap();

        let placer = FilePlacer::new(&dest_root, OperationMode::Move, ConflictPolicy::Overwrite);
        let outcome = placer.place(&source, &march_15()).unwrap();

        assert_eq!(
            outcome,
            PlaceOutcome::Transferred(month_dir.join("photo.jpg"))
        );
        assert!(!source.exists());
        assert_eq!(fs::read(month_dir.join("photo.jpg")).unwrap(), b"new content");
    }

    #[test]
    fn test_directory_creation_failure_is_error() {
        let (_temp, source, dest_root) = setup();
        fs::create_dir_all(&dest_root).unwrap();
        fs::write(dest_root.join("2023"), b"blocking file").unwrap();

        let placer = FilePlacer::new(&dest_root, OperationMode::Move, ConflictPolicy::Overwrite);

        assert!(placer.place(&source, &march_15()).is_err());
        assert!(source.exists());
    }

    #[test]
    fn test_next_free_name_without_extension() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("README");
        fs::write(&target, b"x").unwrap();
        assert_eq!(next_free_name(&target), temp_dir.path().join("README (1)"));
    }
}
