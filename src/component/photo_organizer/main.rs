use super::organizer::{OrganizeRequest, OrganizeSummary, PhotoOrganizer, ProgressEvent};
use crate::config::save::{add_recent_path, save_settings};
use crate::config::{Config, OperationMode};
use crate::tools::{ensure_directory_exists, open_in_file_browser};
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use rust_i18n::t;
use std::path::{Path, PathBuf};

/// 依拍攝日期整理照片的互動流程
pub struct PhotoDateOrganizer<'a> {
    config: &'a mut Config,
}

impl<'a> PhotoDateOrganizer<'a> {
    pub const fn new(config: &'a mut Config) -> Self {
        Self { config }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style(t!("organize.title")).cyan().bold());

        let Some(source) = self.prompt_source_path()? else {
            return Ok(()); // ESC pressed
        };
        let Some(destination) = self.prompt_destination_path()? else {
            return Ok(());
        };
        let Some(mode) = self.prompt_operation_mode()? else {
            return Ok(());
        };

        if mode == OperationMode::Move && !Self::confirm_move()? {
            println!("{}", style(t!("organize.cancelled")).yellow());
            return Ok(());
        }

        self.remember_paths(&source, &destination);

        let request = OrganizeRequest::new(&source, &destination, mode)
            .with_conflict_policy(self.config.settings.conflict_policy);
        let mut organizer = PhotoOrganizer::new(request);

        println!("{}", style(t!("organize.scanning")).dim());
        let progress_bar = ProgressBar::hidden();
        progress_bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {percent:>3}% {msg}")?
                .progress_chars("=>-"),
        );

        let operation = match mode {
            OperationMode::Copy => t!("organize.copying"),
            OperationMode::Move => t!("organize.moving"),
        };

        let result = organizer.run(|event| match event {
            ProgressEvent::FilesFound { total } if *total > 0 => {
                progress_bar.set_length(*total as u64);
                progress_bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            }
            ProgressEvent::FileStarted {
                index,
                total,
                file_name,
            } => {
                progress_bar.set_message(format!("{operation}: {file_name} ({index}/{total})"));
            }
            ProgressEvent::FilePlaced { .. } => progress_bar.inc(1),
            _ => {}
        });
        progress_bar.finish_and_clear();

        match result {
            Ok(summary) if summary.is_empty() => {
                println!("{}", style(t!("organize.no_files")).yellow());
            }
            Ok(summary) => {
                Self::print_result(&summary);
                Self::offer_open_destination(&summary.destination)?;
            }
            Err(e) => {
                println!("{}", style(t!("organize.failed")).red().bold());
                eprintln!("{} {e:#}", style(t!("main_menu.error_prefix")).red().bold());
            }
        }

        Ok(())
    }

    /// 從歷史路徑選擇或輸入新路徑
    fn prompt_from_recent(recent_paths: &[String], prompt: &str) -> Result<Option<String>> {
        if recent_paths.is_empty() {
            let path: String = Input::new().with_prompt(prompt).interact_text()?;
            return Ok(Some(path.trim().to_string()));
        }

        let mut options: Vec<String> = recent_paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let indicator = if Path::new(p).exists() { "✓" } else { "✗" };
                format!("{} [{}] {}", i + 1, indicator, p)
            })
            .collect();
        options.push(t!("organize.enter_new_path").to_string());

        println!("{}", style(t!("common.esc_hint")).dim());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&options)
            .default(0)
            .interact_opt()?;

        match selection {
            None => Ok(None),
            Some(idx) if idx < recent_paths.len() => Ok(Some(recent_paths[idx].clone())),
            Some(_) => {
                let path: String = Input::new().with_prompt(prompt).interact_text()?;
                Ok(Some(path.trim().to_string()))
            }
        }
    }

    fn prompt_source_path(&self) -> Result<Option<PathBuf>> {
        let path = Self::prompt_from_recent(
            &self.config.settings.recent_source_paths,
            &t!("organize.source_prompt"),
        )?;
        Ok(path.map(PathBuf::from))
    }

    /// 選擇既有資料夾，或在指定的上層資料夾中建立新資料夾
    fn prompt_destination_path(&self) -> Result<Option<PathBuf>> {
        let options = vec![
            t!("organize.destination_existing"),
            t!("organize.destination_new"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("organize.destination_prompt"))
            .items(&options)
            .default(0)
            .interact_opt()?;

        match selection {
            None => Ok(None),
            Some(0) => {
                let path = Self::prompt_from_recent(
                    &self.config.settings.recent_destination_paths,
                    &t!("organize.destination_path_prompt"),
                )?;
                Ok(path.map(PathBuf::from))
            }
            Some(_) => {
                let parent: String = Input::new()
                    .with_prompt(t!("organize.parent_prompt"))
                    .interact_text()?;
                let name: String = Input::new()
                    .with_prompt(t!("organize.folder_name_prompt"))
                    .validate_with(|input: &String| {
                        if input.trim().is_empty() {
                            Err(t!("organize.folder_name_empty").to_string())
                        } else {
                            Ok(())
                        }
                    })
                    .interact_text()?;

                let destination = Path::new(parent.trim()).join(name.trim());
                ensure_directory_exists(&destination)?;
                println!(
                    "{}",
                    style(t!("organize.folder_created", path = destination.display())).green()
                );
                Ok(Some(destination))
            }
        }
    }

    fn prompt_operation_mode(&self) -> Result<Option<OperationMode>> {
        let modes = [OperationMode::Copy, OperationMode::Move];
        let items = vec![t!("organize.mode_copy"), t!("organize.mode_move")];

        let default_index = modes
            .iter()
            .position(|&m| m == self.config.settings.operation_mode)
            .unwrap_or(0);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("organize.mode_prompt"))
            .items(&items)
            .default(default_index)
            .interact_opt()?;

        Ok(selection.map(|idx| modes[idx]))
    }

    fn confirm_move() -> Result<bool> {
        println!("{}", style(t!("organize.move_warning")).yellow().bold());
        let confirm = Confirm::new()
            .with_prompt(t!("organize.move_confirm"))
            .default(false)
            .interact()?;
        Ok(confirm)
    }

    /// 更新路徑歷史並儲存
    fn remember_paths(&mut self, source: &Path, destination: &Path) {
        let settings = &mut self.config.settings;
        add_recent_path(
            &mut settings.recent_source_paths,
            &source.display().to_string(),
        );
        add_recent_path(
            &mut settings.recent_destination_paths,
            &destination.display().to_string(),
        );
        if let Err(e) = save_settings(settings) {
            warn!("無法儲存路徑歷史: {e}");
        }
    }

    fn print_result(summary: &OrganizeSummary) {
        println!();
        let message = match summary.mode {
            OperationMode::Copy => t!("organize.done_copied", count = summary.transferred),
            OperationMode::Move => t!("organize.done_moved", count = summary.transferred),
        };
        println!("{}", style(message).green().bold());

        if summary.skipped > 0 {
            println!(
                "  {}",
                style(t!("organize.skipped", count = summary.skipped)).yellow()
            );
        }
        println!(
            "  {} {}",
            style(t!("organize.destination_label")).dim(),
            summary.destination.display()
        );
    }

    fn offer_open_destination(destination: &Path) -> Result<()> {
        let open = Confirm::new()
            .with_prompt(t!("organize.open_prompt"))
            .default(false)
            .interact()?;

        if !open {
            return Ok(());
        }
        if let Err(e) = open_in_file_browser(destination) {
            eprintln!("{} {e:#}", style(t!("main_menu.error_prefix")).red().bold());
        }
        Ok(())
    }
}
