use super::date_resolver::resolve_capture_date;
use super::file_placer::{FilePlacer, PlaceOutcome};
use crate::config::{ConflictPolicy, OperationMode};
use crate::tools::{ImageFile, ensure_directory_exists, scan_image_files, validate_directory_exists};
use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// 一次整理作業的輸入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: OperationMode,
    pub conflict_policy: ConflictPolicy,
}

impl OrganizeRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        mode: OperationMode,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            mode,
            conflict_policy: ConflictPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_conflict_policy(mut self, conflict_policy: ConflictPolicy) -> Self {
        self.conflict_policy = conflict_policy;
        self
    }

    /// 開始前的檢查：兩個資料夾都必須選擇，來源必須存在
    pub fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() || self.destination.as_os_str().is_empty() {
            bail!("請選擇來源與目標資料夾");
        }
        validate_directory_exists(&self.source)
    }
}

/// 整理作業的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Scanning,
    Processing { index: usize, total: usize },
    Done,
    Failed,
}

/// 進度事件，index 從 1 開始
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    ScanStarted {
        source: &'a Path,
    },
    FilesFound {
        total: usize,
    },
    FileStarted {
        index: usize,
        total: usize,
        file_name: &'a str,
    },
    FilePlaced {
        index: usize,
        total: usize,
        outcome: &'a PlaceOutcome,
    },
}

impl ProgressEvent<'_> {
    /// 完成百分比，只有單檔事件才有
    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        match *self {
            Self::FileStarted { index, total, .. } | Self::FilePlaced { index, total, .. } => {
                Some(percent(index, total))
            }
            Self::ScanStarted { .. } | Self::FilesFound { .. } => None,
        }
    }
}

#[must_use]
pub fn percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    index as f64 / total as f64 * 100.0
}

/// 整理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeSummary {
    pub total: usize,
    pub transferred: usize,
    pub skipped: usize,
    pub mode: OperationMode,
    pub destination: PathBuf,
}

impl OrganizeSummary {
    fn empty(request: &OrganizeRequest) -> Self {
        Self {
            total: 0,
            transferred: 0,
            skipped: 0,
            mode: request.mode,
            destination: request.destination.clone(),
        }
    }

    /// 來源資料夾中沒有可整理的圖片
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// 依拍攝日期整理照片
///
/// 單執行緒依序處理，遇到第一個錯誤即中止，已處理的檔案不會還原。
pub struct PhotoOrganizer {
    request: OrganizeRequest,
    state: RunState,
}

impl PhotoOrganizer {
    #[must_use]
    pub fn new(request: OrganizeRequest) -> Self {
        Self {
            request,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    pub fn run<F>(&mut self, mut on_progress: F) -> Result<OrganizeSummary>
    where
        F: FnMut(&ProgressEvent<'_>),
    {
        let result = self.run_inner(&mut on_progress);
        match &result {
            Ok(_) => self.state = RunState::Done,
            Err(e) => {
                warn!("整理作業中止: {e:#}");
                self.state = RunState::Failed;
            }
        }
        result
    }

    fn run_inner<F>(&mut self, on_progress: &mut F) -> Result<OrganizeSummary>
    where
        F: FnMut(&ProgressEvent<'_>),
    {
        self.request.validate()?;

        self.state = RunState::Scanning;
        on_progress(&ProgressEvent::ScanStarted {
            source: &self.request.source,
        });
        info!("開始掃描目錄: {}", self.request.source.display());

        let files = scan_image_files(&self.request.source)?;
        let total = files.len();
        on_progress(&ProgressEvent::FilesFound { total });

        let mut summary = OrganizeSummary::empty(&self.request);
        if files.is_empty() {
            info!("找不到任何圖片檔案: {}", self.request.source.display());
            return Ok(summary);
        }
        summary.total = total;

        info!(
            "找到 {total} 個圖片檔案，模式: {}，目標: {}",
            self.request.mode,
            self.request.destination.display()
        );
        ensure_directory_exists(&self.request.destination)?;

        let placer = FilePlacer::new(
            &self.request.destination,
            self.request.mode,
            self.request.conflict_policy,
        );

        for (offset, file) in files.iter().enumerate() {
            let index = offset + 1;
            self.state = RunState::Processing { index, total };
            on_progress(&ProgressEvent::FileStarted {
                index,
                total,
                file_name: &file.file_name,
            });

            let outcome = Self::process_file(&placer, file)?;
            if outcome.is_skipped() {
                summary.skipped += 1;
            } else {
                summary.transferred += 1;
            }

            on_progress(&ProgressEvent::FilePlaced {
                index,
                total,
                outcome: &outcome,
            });
        }

        info!(
            "整理完成 - 處理: {}, 略過: {}",
            summary.transferred, summary.skipped
        );
        Ok(summary)
    }

    fn process_file(placer: &FilePlacer, file: &ImageFile) -> Result<PlaceOutcome> {
        let date = resolve_capture_date(&file.path);
        placer
            .place(&file.path, &date)
            .with_context(|| format!("處理檔案失敗: {}", file.file_name))
    }
}
