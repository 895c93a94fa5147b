use anyhow::{Context, Result};
use log::debug;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

/// 複製檔案，並保留原檔的存取與修改時間
///
/// 唯讀的來源（例如記憶卡上的照片）複製後目標也是唯讀，設定時間時不能以寫入模式開檔。
pub fn copy_preserving_times(source: &Path, target: &Path) -> Result<()> {
    let metadata = fs::metadata(source)
        .with_context(|| format!("無法讀取檔案資訊: {}", source.display()))?;

    // fs::copy 會一併複製權限
    fs::copy(source, target).with_context(|| {
        format!("複製檔案失敗: {} -> {}", source.display(), target.display())
    })?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    open_for_times(target)
        .and_then(|file| file.set_times(times))
        .with_context(|| format!("無法設定檔案時間: {}", target.display()))?;

    Ok(())
}

/// 指定時間只需要檔案擁有者身分，唯讀開檔即可
#[cfg(not(windows))]
fn open_for_times(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Windows 需要 FILE_WRITE_ATTRIBUTES，唯讀屬性不影響此權限
#[cfg(windows)]
fn open_for_times(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    File::options()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .open(path)
}

/// 移動檔案；只有跨檔案系統時才改為複製後刪除
pub fn move_file(source: &Path, target: &Path) -> Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                "跨檔案系統，改用複製後刪除 {} -> {}",
                source.display(),
                target.display()
            );
            copy_and_delete(source, target)
        }
        Err(e) => Err(e).with_context(|| {
            format!("重新命名失敗: {} -> {}", source.display(), target.display())
        }),
    }
}

/// 複製檔案後刪除原檔案
fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
    copy_preserving_times(source, target)?;
    fs::remove_file(source).with_context(|| format!("刪除原檔案失敗: {}", source.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_copy_preserves_content_and_mtime() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        let target = temp_dir.path().join("copy.jpg");
        fs::write(&source, b"image bytes").unwrap();

        let old_time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(old_time)
            .unwrap();

        copy_preserving_times(&source, &target).unwrap();

        assert!(source.exists());
        assert_eq!(fs::read(&target).unwrap(), b"image bytes");
        assert_eq!(fs::metadata(&target).unwrap().modified().unwrap(), old_time);
    }

    #[test]
    fn test_move_file_removes_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        let target_dir = temp_dir.path().join("out");
        fs::create_dir(&target_dir).unwrap();
        let target = target_dir.join("photo.jpg");
        fs::write(&source, b"image bytes").unwrap();

        move_file(&source, &target).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&target).unwrap(), b"image bytes");
    }

    #[test]
    fn test_copy_read_only_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("card.jpg");
        let target = temp_dir.path().join("copy.jpg");
        fs::write(&source, b"from camera card").unwrap();

        let old_time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_200_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(old_time)
            .unwrap();
        let mut permissions = fs::metadata(&source).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&source, permissions).unwrap();

        copy_preserving_times(&source, &target).unwrap();

        let target_metadata = fs::metadata(&target).unwrap();
        assert!(target_metadata.permissions().readonly(), "應保留唯讀權限");
        assert_eq!(target_metadata.modified().unwrap(), old_time);
        assert_eq!(fs::read(&target).unwrap(), b"from camera card");
    }

    #[test]
    fn test_move_rename_error_does_not_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        let target = temp_dir.path().join("missing_dir").join("photo.jpg");
        fs::write(&source, b"image bytes").unwrap();

        let error = move_file(&source, &target).unwrap_err();

        assert!(format!("{error:#}").contains("重新命名失敗"));
        assert!(source.exists());
        assert!(!target.exists());
    }

    #[test]
    fn test_move_missing_source_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = move_file(
            &temp_dir.path().join("missing.jpg"),
            &temp_dir.path().join("target.jpg"),
        );
        assert!(result.is_err());
    }
}
