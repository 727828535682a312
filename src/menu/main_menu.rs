use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::{run_editor, run_quick_convert};
use crate::tools::{OutputFormat, ensure_directory_exists};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_editor"),
        t!("main_menu.opt_quick_convert"),
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
            run_editor(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_quick_convert(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(2) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(3) | None => Ok(false),
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
            t!("settings.opt_output_dir"),
            t!("settings.opt_default_format"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_output_dir_menu(term, config)?,
            Some(1) => show_default_format_menu(term, config)?,
            Some(2) => show_language_menu(term, config)?,
            Some(3) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 輸出資料夾設定
fn show_output_dir_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.output_dir.title")).cyan().bold());
    println!(
        "\n{} {}\n",
        style(t!("settings.output_dir.current")).dim(),
        config.settings.output_directory
    );

    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.output_dir.prompt"))
        .with_initial_text(config.settings.output_directory.clone())
        .interact_text_on(term)?;
    let directory = input.trim().to_string();

    if directory.is_empty() || directory == config.settings.output_directory {
        return Ok(());
    }

    if let Err(e) = ensure_directory_exists(Path::new(&directory)) {
        eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold());
        std::thread::sleep(std::time::Duration::from_secs(2));
        return Ok(());
    }

    config.settings.output_directory = directory;
    save_settings(&config.settings)?;
    println!(
        "\n{} {}",
        style(t!("settings.saved")).green(),
        config.settings.output_directory
    );
    std::thread::sleep(std::time::Duration::from_secs(1));

    Ok(())
}

/// 預設輸出格式設定
fn show_default_format_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.format.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());
    println!(
        "\n{} {}\n",
        style(t!("settings.format.current")).dim(),
        config.settings.default_format
    );

    let formats = OutputFormat::ALL;
    let items: Vec<String> = formats.iter().map(ToString::to_string).collect();
    let default_index = formats
        .iter()
        .position(|&f| f == config.settings.default_format)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.format.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_format = formats[selection];

    if selected_format != config.settings.default_format {
        config.settings.default_format = selected_format;
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            selected_format
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];

    let items: Vec<String> = languages.iter().map(|l: &Language| l.to_string()).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];

    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            selected_lang
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
