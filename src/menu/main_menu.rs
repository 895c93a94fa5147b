use crate::config::save::save_settings;
use crate::config::types::{Config, ConflictPolicy, Language, OperationMode};
use crate::menu::handlers::run_photo_organizer;
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use rust_i18n::t;
use std::fmt::Display;

pub fn show_main_menu(term: &Term, config: &mut Config) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_organize"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_photo_organizer(term, config)?;
            Ok(true)
        }
        Some(1) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(2) => Ok(false),
        None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_mode"),
            t!("settings.opt_conflict"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_mode_menu(term, config)?,
            Some(1) => show_conflict_menu(term, config)?,
            Some(2) => show_language_menu(term, config)?,
            Some(3) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 顯示單一設定的選項，回傳使用者選擇的值（ESC 回傳 None）
fn select_setting<T: Copy + PartialEq + Display>(
    term: &Term,
    title: &str,
    choices: &[T],
    labels: &[String],
    current: T,
) -> Result<Option<T>> {
    term.clear_screen()?;

    println!("{}", style(title).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());
    println!("\n{} {}\n", style(t!("settings.current")).dim(), current);

    let default_index = choices.iter().position(|&c| c == current).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.select_prompt"))
        .items(labels)
        .default(default_index)
        .interact_on_opt(term)?;

    Ok(selection.map(|idx| choices[idx]))
}

fn announce_saved(value: impl Display) {
    println!("\n{} {}", style(t!("settings.saved")).green(), value);
    std::thread::sleep(std::time::Duration::from_secs(1));
}

/// 預設整理模式
fn show_mode_menu(term: &Term, config: &mut Config) -> Result<()> {
    let modes = [OperationMode::Copy, OperationMode::Move];
    let labels = vec![
        t!("organize.mode_copy").to_string(),
        t!("organize.mode_move").to_string(),
    ];

    let Some(selected) = select_setting(
        term,
        &t!("settings.mode_title"),
        &modes,
        &labels,
        config.settings.operation_mode,
    )?
    else {
        return Ok(());
    };

    if selected != config.settings.operation_mode {
        config.settings.operation_mode = selected;
        save_settings(&config.settings)?;
        announce_saved(selected);
    }

    Ok(())
}

/// 同名檔案處理方式
fn show_conflict_menu(term: &Term, config: &mut Config) -> Result<()> {
    let policies = [
        ConflictPolicy::Overwrite,
        ConflictPolicy::Skip,
        ConflictPolicy::Rename,
    ];
    let labels = vec![
        t!("settings.conflict_overwrite").to_string(),
        t!("settings.conflict_skip").to_string(),
        t!("settings.conflict_rename").to_string(),
    ];

    let Some(selected) = select_setting(
        term,
        &t!("settings.conflict_title"),
        &policies,
        &labels,
        config.settings.conflict_policy,
    )?
    else {
        return Ok(());
    };

    if selected != config.settings.conflict_policy {
        config.settings.conflict_policy = selected;
        save_settings(&config.settings)?;
        announce_saved(selected);
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    let languages = [Language::EnUs, Language::ZhTw];
    let labels: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let Some(selected) = select_setting(
        term,
        &t!("settings.language_title"),
        &languages,
        &labels,
        config.settings.language,
    )?
    else {
        return Ok(());
    };

    if selected != config.settings.language {
        config.settings.language = selected;
        rust_i18n::set_locale(selected.as_str());
        save_settings(&config.settings)?;
        announce_saved(selected);
    }

    Ok(())
}
