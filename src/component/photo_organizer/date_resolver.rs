use chrono::{DateTime, Datelike, Local, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use log::debug;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;

/// EXIF 日期時間格式 `YYYY:MM:DD HH:MM:SS`
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// 拍攝日期的來源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// EXIF `DateTimeOriginal`
    Metadata,
    /// 檔案系統建立時間
    FileCreated,
    /// 平台不支援建立時間時，改用修改時間
    FileModified,
    /// 連檔案資訊都無法讀取時的最後手段
    Now,
}

/// 圖片的拍攝日期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureDate {
    pub timestamp: NaiveDateTime,
    pub source: DateSource,
}

impl CaptureDate {
    #[must_use]
    pub const fn new(timestamp: NaiveDateTime, source: DateSource) -> Self {
        Self { timestamp, source }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    /// 年份資料夾名稱，例如 `2023`
    #[must_use]
    pub fn year_folder(&self) -> String {
        self.year().to_string()
    }

    /// 月份資料夾名稱，例如 `03-March`
    #[must_use]
    pub fn month_folder(&self) -> String {
        self.timestamp.format("%m-%B").to_string()
    }
}

/// 取得檔案的拍攝日期，一定會回傳結果
///
/// 先嘗試讀取 EXIF 的 `DateTimeOriginal`，失敗時改用檔案系統時間。
#[must_use]
pub fn resolve_capture_date(path: &Path) -> CaptureDate {
    match read_metadata_date(path) {
        Some(timestamp) => CaptureDate::new(timestamp, DateSource::Metadata),
        None => {
            let date = filesystem_date(path);
            debug!(
                "無可用的拍攝時間，改用檔案時間 ({:?}): {}",
                date.source,
                path.display()
            );
            date
        }
    }
}

/// 讀取 EXIF `DateTimeOriginal`，任何失敗都回傳 None
#[must_use]
pub fn read_metadata_date(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut reader).ok()?;

    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(values) => {
            let raw = values.first()?;
            parse_exif_datetime(std::str::from_utf8(raw).ok()?)
        }
        _ => None,
    }
}

#[must_use]
pub fn parse_exif_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim_end_matches('\0').trim();
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATE_FORMAT).ok()
}

/// 檔案系統時間：建立時間 > 修改時間 > 現在時間
#[must_use]
pub fn filesystem_date(path: &Path) -> CaptureDate {
    let Ok(metadata) = fs::metadata(path) else {
        return CaptureDate::new(Local::now().naive_local(), DateSource::Now);
    };

    if let Ok(created) = metadata.created() {
        return CaptureDate::new(to_local_naive(created), DateSource::FileCreated);
    }
    if let Ok(modified) = metadata.modified() {
        return CaptureDate::new(to_local_naive(modified), DateSource::FileModified);
    }
    CaptureDate::new(Local::now().naive_local(), DateSource::Now)
}

fn to_local_naive(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}
