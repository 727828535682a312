use crate::component::playback_sync::{PreviewStatus, ToggleOutcome};
use crate::component::trim_selector::{Handle, PressOutcome, TrimRange};
use crate::component::{EditorSession, ExportOptions, ProbeStatus};
use crate::config::Config;
use crate::menu::handlers::run_export;
use crate::menu::track_view::{format_timestamp, render_track, track_columns, track_width_for};
use crate::pause;
use crate::tools::{OutputFormat, available_framerates, available_sizes, time_to_pixel};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use log::debug;
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 預覽畫面的更新間隔
const PREVIEW_TICK: Duration = Duration::from_millis(100);

/// 等待播放開始的最多次數
const MAX_START_POLLS: usize = 20;

pub(super) fn run_editor_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
    session: &mut EditorSession,
) -> Result<()> {
    loop {
        term.clear_screen()?;
        let columns = fit_track_to_terminal(term, config, session);
        print_session_summary(session, columns);

        let options = vec![
            t!("editor.opt_trim"),
            t!("editor.opt_clear_trim"),
            t!("editor.opt_preview"),
            t!("editor.opt_export"),
            t!("editor.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("editor.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => prompt_trim(term, session)?,
            Some(1) => {
                set_trim_seconds(session, None, None);
            }
            Some(2) => run_preview(term, shutdown_signal, config, session)?,
            Some(3) => {
                if let Some(options) = prompt_export_options(term, config, session)? {
                    run_export(config, session, &options)?;
                    pause(term)?;
                }
            }
            Some(4) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 依終端機目前的寬度調整軌道，回傳軌道欄數
pub(super) fn fit_track_to_terminal(
    term: &Term,
    config: &Config,
    session: &mut EditorSession,
) -> usize {
    let (_, terminal_width) = term.size();
    let columns = track_columns(terminal_width);
    session.set_track_width(track_width_for(columns, config.settings.track.width_px));
    columns
}

fn print_session_summary(session: &EditorSession, columns: usize) {
    println!("{}", style(t!("editor.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());
    println!();

    if let Some(asset) = session.asset() {
        println!("  {} {}", style(t!("editor.file")).dim(), asset.file_name());
    }

    match session.probe_status() {
        ProbeStatus::Ready(metadata) => println!(
            "  {} {} | {}x{} | {:.2} fps",
            style(t!("editor.info")).dim(),
            format_timestamp(metadata.duration),
            metadata.width,
            metadata.height,
            metadata.fps
        ),
        ProbeStatus::Pending | ProbeStatus::Failed => {
            println!("  {}", style(t!("editor.probe_failed")).yellow());
        }
    }

    println!(
        "  {} {}",
        style(t!("editor.thumbnails")).dim(),
        session.thumbnails().len()
    );

    let range = session.trim_range();
    println!(
        "  {} {} → {}",
        style(t!("editor.trim")).dim(),
        range.start.map_or_else(|| "--".to_string(), format_timestamp),
        range.stop.map_or_else(|| "--".to_string(), format_timestamp)
    );
    println!(
        "  {}",
        render_track(&session.trim_geometry(), session.cursor_px(), columns)
    );

    if session.preview_status() == PreviewStatus::Unavailable {
        println!("  {}", style(t!("editor.preview_unavailable")).dim());
    }
    println!();
}

/// 以秒數設定裁剪範圍
///
/// 換算成軌道像素後依序拖曳把手，結果與滑鼠操作相同。
/// 影片資訊未就緒時把手無法拖曳，範圍維持不變。
pub fn set_trim_seconds(
    session: &mut EditorSession,
    start: Option<f64>,
    stop: Option<f64>,
) -> TrimRange {
    let duration = session.metadata().duration;
    let width = session.track().width_px;

    // 先把右把手拉到底，左把手才有移動空間
    drag_handle(session, Handle::Right, width);
    let left_target = start.map_or(0.0, |s| time_to_pixel(s, width, duration));
    drag_handle(session, Handle::Left, left_target);
    let right_target = stop.map_or(width, |s| time_to_pixel(s, width, duration));
    drag_handle(session, Handle::Right, right_target);

    session.trim_range()
}

fn drag_handle(session: &mut EditorSession, handle: Handle, target_px: f64) {
    let geometry = session.trim_geometry();
    let grab_px = match handle {
        Handle::Left => geometry.left_handle().center(),
        Handle::Right => geometry.right_handle().center(),
    };

    match session.pointer_press(grab_px) {
        PressOutcome::DragStarted(grabbed) if grabbed == handle => {
            session.pointer_move(target_px);
            session.pointer_release();
        }
        PressOutcome::DragStarted(grabbed) => {
            debug!("拖曳到另一個把手 {grabbed:?}，放棄移動");
            session.pointer_release();
        }
        PressOutcome::Seek { .. } | PressOutcome::Blocked | PressOutcome::Ignored => {}
    }
}

fn prompt_trim(term: &Term, session: &mut EditorSession) -> Result<()> {
    if !matches!(session.probe_status(), ProbeStatus::Ready(_)) {
        println!("{}", style(t!("editor.trim_blocked")).yellow());
        pause(term)?;
        return Ok(());
    }

    let range = session.trim_range();
    let start = prompt_seconds(&t!("editor.trim_start"), range.start)?;
    let stop = prompt_seconds(&t!("editor.trim_stop"), range.stop)?;

    let range = set_trim_seconds(session, start, stop);
    debug!("裁剪範圍: {range:?}");
    Ok(())
}

/// 輸入秒數，留白表示不設定
fn prompt_seconds(prompt: &str, current: Option<f64>) -> Result<Option<f64>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current.map(|s| format!("{s:.2}")).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|text: &String| -> Result<(), String> {
            let text = text.trim();
            if text.is_empty() || text.parse::<f64>().is_ok_and(|s| s >= 0.0) {
                Ok(())
            } else {
                Err(t!("editor.invalid_seconds").to_string())
            }
        })
        .interact_text()?;

    let text = input.trim();
    Ok(if text.is_empty() {
        None
    } else {
        text.parse().ok()
    })
}

/// 播放預覽，到達裁剪終點或按下 Ctrl-C 時停止
fn run_preview(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
    session: &mut EditorSession,
) -> Result<()> {
    if session.preview_status() == PreviewStatus::Unavailable {
        println!("{}", style(t!("editor.preview_unavailable")).yellow());
        pause(term)?;
        return Ok(());
    }

    shutdown_signal.store(false, Ordering::SeqCst);
    if session.toggle_play() == ToggleOutcome::Unavailable {
        return Ok(());
    }

    println!("{}", style(t!("editor.preview_hint")).dim());

    let mut started = false;
    let mut polls = 0usize;
    loop {
        session.pump_playback();
        let Some(state) = session.playback_state() else {
            break;
        };

        let columns = fit_track_to_terminal(term, config, session);
        let line = format!(
            "{} {}",
            render_track(&session.trim_geometry(), session.cursor_px(), columns),
            format_timestamp(state.current_time)
        );
        term.clear_line()?;
        term.write_str(&line)?;

        if shutdown_signal.load(Ordering::SeqCst) {
            if state.playing {
                session.toggle_play();
                session.pump_playback();
            }
            break;
        }

        started |= state.playing;
        polls += 1;
        if (started && !state.playing) || (!started && polls > MAX_START_POLLS) {
            break;
        }
        if session.preview_status() == PreviewStatus::Unavailable {
            break;
        }

        std::thread::sleep(PREVIEW_TICK);
    }

    shutdown_signal.store(false, Ordering::SeqCst);
    term.write_line("")?;
    pause(term)?;
    Ok(())
}

/// 選擇輸出格式；動畫輸出可再選尺寸與幀率
fn prompt_export_options(
    term: &Term,
    config: &Config,
    session: &EditorSession,
) -> Result<Option<ExportOptions>> {
    if session.is_exporting() {
        println!("{}", style(t!("export.busy")).yellow());
        pause(term)?;
        return Ok(None);
    }

    let Some(asset) = session.asset() else {
        return Ok(None);
    };

    let mut formats = config.format_table.allowed_formats(asset.mime_type());
    if formats.is_empty() {
        formats = OutputFormat::ALL.to_vec();
    }
    let items: Vec<String> = formats.iter().map(ToString::to_string).collect();
    let default_index = formats
        .iter()
        .position(|&f| f == config.settings.default_format)
        .unwrap_or(0);

    let Some(selection) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("export.choose_format"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?
    else {
        return Ok(None);
    };

    let mut options = ExportOptions {
        format: formats[selection],
        ..ExportOptions::default()
    };

    let ProbeStatus::Ready(metadata) = session.probe_status() else {
        return Ok(Some(options));
    };
    if !options.format.is_animated() {
        return Ok(Some(options));
    }

    let sizes = available_sizes(metadata.width, metadata.height);
    let mut size_items = vec![t!("export.original").to_string()];
    size_items.extend(sizes.iter().map(ToString::to_string));
    let Some(size_index) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("export.choose_size"))
        .items(&size_items)
        .default(0)
        .interact_on_opt(term)?
    else {
        return Ok(None);
    };
    options.size = size_index.checked_sub(1).map(|i| sizes[i]);

    let framerates = available_framerates(metadata.fps);
    let mut framerate_items = vec![t!("export.original").to_string()];
    framerate_items.extend(framerates.iter().map(|fps| format!("{fps} fps")));
    let Some(framerate_index) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("export.choose_framerate"))
        .items(&framerate_items)
        .default(0)
        .interact_on_opt(term)?
    else {
        return Ok(None);
    };
    options.framerate = framerate_index.checked_sub(1).map(|i| framerates[i]);

    Ok(Some(options))
}
