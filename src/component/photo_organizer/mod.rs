//! 依拍攝日期整理照片
//!
//! 讀取 EXIF 拍攝時間（失敗時改用檔案時間），把圖片複製或移動到 `年/月` 資料夾

mod date_resolver;
mod file_placer;
mod main;
mod organizer;

pub use date_resolver::{
    CaptureDate, DateSource, EXIF_DATE_FORMAT, filesystem_date, parse_exif_datetime,
    read_metadata_date, resolve_capture_date,
};
pub use file_placer::{FilePlacer, PlaceOutcome, destination_dir};
pub use main::PhotoDateOrganizer;
pub use organizer::{
    OrganizeRequest, OrganizeSummary, PhotoOrganizer, ProgressEvent, RunState, percent,
};
