use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// 目前平台的檔案瀏覽器指令
#[must_use]
pub const fn file_browser_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// 以系統檔案瀏覽器開啟資料夾
pub fn open_in_file_browser(path: &Path) -> Result<()> {
    let program = file_browser_command();
    // explorer 成功時也會回傳非零狀態碼，只檢查能否啟動
    Command::new(program)
        .arg(path)
        .spawn()
        .with_context(|| format!("無法執行 {program} 開啟資料夾: {}", path.display()))?;
    Ok(())
}
