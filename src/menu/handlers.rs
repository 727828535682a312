use crate::component::{
    ClockPlayback, EditorSession, ExportOptions, ExportStatus, ExportedFile, ProbeStatus,
};
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::menu::editor_menu::{fit_track_to_terminal, run_editor_menu};
use crate::pause;
use crate::tools::{FfmpegEngine, MediaAsset, ensure_directory_exists, unique_output_path};
use anyhow::{Context, Result, bail};
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 依副檔名判斷 MIME 類型並讀入影片
pub fn load_media_asset(config: &Config, path: &Path) -> Result<MediaAsset> {
    let Some(mime_type) = config.format_table.mime_for_path(path) else {
        bail!("不支援的檔案格式: {}", path.display());
    };
    if !config.format_table.is_supported(mime_type) {
        bail!("不支援的檔案格式: {}", path.display());
    }
    MediaAsset::load(path, mime_type)
}

/// 把匯出結果寫到輸出資料夾，檔名重複時自動加上序號
pub fn save_exported_file(directory: &Path, file: &ExportedFile) -> Result<PathBuf> {
    ensure_directory_exists(directory)?;
    let path = unique_output_path(directory, &file.suggested_filename);
    fs::write(&path, &file.bytes)
        .with_context(|| format!("無法寫入檔案: {}", path.display()))?;
    Ok(path)
}

pub fn run_editor(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let Some(mut session) = open_session(term, shutdown_signal, config)? else {
        pause(term)?;
        return Ok(());
    };

    let Some(asset) = prompt_asset(term, config)? else {
        return Ok(());
    };

    fit_track_to_terminal(term, config, &mut session);
    println!("{}", style(t!("editor.sampling")).cyan());
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Invalid progress bar template"),
    );

    let mut sampled = 0usize;
    let outcome = session.load_asset(asset, |frame| {
        sampled += 1;
        progress_bar.set_message(format!("#{sampled} @ {:.2}s", frame.timestamp));
        progress_bar.tick();
    });
    progress_bar.finish_and_clear();

    if outcome.cancelled {
        println!("{}", style(t!("editor.sampling_cancelled")).yellow());
        session.cancel();
        pause(term)?;
        return Ok(());
    }

    match session.probe_status() {
        ProbeStatus::Ready(metadata) => {
            println!(
                "{}",
                style(t!(
                    "editor.sampling_done",
                    extracted = outcome.extracted,
                    attempted = outcome.attempted
                ))
                .green()
            );
            session.attach_preview(Box::new(ClockPlayback::new(metadata.duration)));
        }
        ProbeStatus::Pending | ProbeStatus::Failed => {
            println!("{}", style(t!("editor.probe_failed")).yellow());
        }
    }
    std::thread::sleep(std::time::Duration::from_secs(1));

    run_editor_menu(term, shutdown_signal, config, &mut session)?;
    session.cancel();
    Ok(())
}

/// 整支影片直接轉成 GIF
pub fn run_quick_convert(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let Some(mut session) = open_session(term, shutdown_signal, config)? else {
        pause(term)?;
        return Ok(());
    };

    let Some(asset) = prompt_asset(term, config)? else {
        return Ok(());
    };

    if session.probe_asset(asset).is_none() {
        println!("{}", style(t!("editor.probe_failed")).yellow());
    }

    let progress_bar = export_progress_bar();
    let result = session.quick_convert(|percent| progress_bar.set_position(u64::from(percent)));
    progress_bar.finish_and_clear();

    report_export(config, result)?;
    pause(term)?;
    Ok(())
}

/// 匯出並顯示進度
pub(super) fn run_export(
    config: &Config,
    session: &mut EditorSession,
    options: &ExportOptions,
) -> Result<()> {
    let progress_bar = export_progress_bar();
    let result = session.export(options, |percent| progress_bar.set_position(u64::from(percent)));
    progress_bar.finish_and_clear();

    report_export(config, result)
}

fn export_progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    progress_bar.set_message(t!("export.running").to_string());
    progress_bar
}

fn report_export(config: &Config, result: Result<ExportStatus>) -> Result<()> {
    match result {
        Ok(ExportStatus::Completed(file)) => {
            let directory = Path::new(&config.settings.output_directory);
            match save_exported_file(directory, &file) {
                Ok(path) => {
                    info!("已儲存: {}", path.display());
                    println!(
                        "{} {}",
                        style(t!("export.saved")).green().bold(),
                        path.display()
                    );
                }
                Err(e) => {
                    warn!("儲存匯出檔案失敗: {e:#}");
                    eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold());
                }
            }
        }
        Ok(ExportStatus::Busy) => {
            println!("{}", style(t!("export.busy")).yellow());
        }
        // 細節已記錄在日誌，畫面上只顯示一則通用訊息
        Err(_) => {
            eprintln!("{}", style(t!("export.failed")).red().bold());
        }
    }
    Ok(())
}

/// 建立引擎；引擎無法使用時不進入編輯器
fn open_session(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<Option<EditorSession>> {
    term.clear_screen()?;

    let engine = match FfmpegEngine::new() {
        Ok(engine) => engine,
        Err(e) => {
            warn!("引擎無法使用: {e:#}");
            eprintln!("{}", style(t!("editor.engine_unavailable")).red().bold());
            return Ok(None);
        }
    };

    Ok(Some(EditorSession::new(
        Box::new(engine),
        config.settings.track,
        Arc::clone(shutdown_signal),
    )))
}

/// 選擇影片檔案；最近使用的路徑排在前面
fn prompt_asset(term: &Term, config: &mut Config) -> Result<Option<MediaAsset>> {
    let path = if config.settings.recent_paths.is_empty() {
        prompt_input_path()?
    } else {
        let mut items: Vec<String> = config.settings.recent_paths.clone();
        items.push(t!("editor.new_path").to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("editor.choose_file"))
            .items(&items)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            None => return Ok(None),
            Some(i) if i < config.settings.recent_paths.len() => {
                config.settings.recent_paths[i].clone()
            }
            Some(_) => prompt_input_path()?,
        }
    };

    if path.is_empty() {
        return Ok(None);
    }

    match load_media_asset(config, Path::new(&path)) {
        Ok(asset) => {
            add_recent_path(&mut config.settings, &path);
            if let Err(e) = save_settings(&config.settings) {
                warn!("無法儲存設定: {e:#}");
            }
            Ok(Some(asset))
        }
        Err(e) => {
            eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold());
            pause(term)?;
            Ok(None)
        }
    }
}

fn prompt_input_path() -> Result<String> {
    let path: String = Input::new()
        .with_prompt(t!("editor.input_path"))
        .interact_text()?;
    Ok(path.trim().trim_matches('"').to_string())
}
