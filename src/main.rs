//! CLI entry point for vidfetch.

use std::env;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vidfetch_core::config::{API_URL_ENV, load_default_file_config};
use vidfetch_core::platform::match_platform;
use vidfetch_core::{DownloadRequestController, FailureReason, FileSaver, platforms};

mod cli;
mod settings;
mod terminal;

use cli::Args;
use settings::{default_log_level, resolve_settings};
use terminal::{TerminalPresenter, init_tracing};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // A broken config file should still get a subscriber so the error is readable
    let loaded = load_default_file_config();
    let file_config = loaded.as_ref().ok().and_then(|l| l.config.as_ref());
    init_tracing(default_log_level(&args, file_config), args.no_color);
    let loaded = loaded?;
    debug!(?args, config_path = ?loaded.path, "CLI arguments parsed");

    if args.list_platforms {
        for definition in platforms() {
            println!("{:<10} {}", definition.key, definition.display_name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let input = read_input(args.url.as_deref())?;

    if args.detect {
        return Ok(detect_only(&input));
    }

    let settings = resolve_settings(
        &args,
        env::var(API_URL_ENV).ok(),
        loaded.config.as_ref(),
        env::var_os("HOME").map(PathBuf::from).as_deref(),
    )?;
    debug!(
        api_base_url = settings.controller.api_base_url(),
        source = ?settings.api_url_source,
        timeout_secs = settings.controller.request_timeout.as_secs(),
        "settings resolved"
    );

    let presenter = Arc::new(TerminalPresenter::new(args.quiet));
    presenter.set_input(&input);
    let controller =
        DownloadRequestController::new(settings.controller.clone(), presenter.clone())?;
    controller.on_input_changed(Some(input.as_str()));

    let abort = CancellationToken::new();
    let signal_abort = abort.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, aborting request");
            signal_abort.cancel();
        }
    });
    let outcome = controller.submit_with_cancel(&input, abort).await;
    ctrl_c.abort();

    if !outcome.is_success() {
        return Ok(ExitCode::FAILURE);
    }
    let Some(target) = presenter.take_save_target() else {
        warn!("request succeeded without a save target");
        return Ok(ExitCode::FAILURE);
    };

    if args.no_save {
        println!("{}", target.url);
        return Ok(ExitCode::SUCCESS);
    }

    let saver = FileSaver::new()?;
    match saver.save(&target, &settings.output_dir).await {
        Ok(saved) => {
            if !args.quiet {
                println!("Saved to: {}", saved.path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!("error: could not save file: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// URL from the positional argument, else the first non-blank stdin line.
fn read_input(positional: Option<&str>) -> Result<String> {
    if let Some(url) = positional {
        return Ok(url.to_string());
    }
    if io::stdin().is_terminal() {
        info!("No input provided. Pass a URL or pipe one via stdin.");
        info!("Example: vidfetch 'https://youtu.be/dQw4w9WgXcQ'");
        return Ok(String::new());
    }
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(line);
        }
    }
    Ok(String::new())
}

fn detect_only(input: &str) -> ExitCode {
    match match_platform(input) {
        Some(found) => {
            match found.content_id {
                Some(id) => println!("{} ({id})", found.definition.display_name),
                None => println!("{}", found.definition.display_name),
            }
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("warning: {}", FailureReason::UnsupportedPlatform.user_message());
            ExitCode::FAILURE
        }
    }
}
