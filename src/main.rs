// codecopy - copy-to-clipboard controls for code blocks, in the terminal
//
// Renders a markdown page, attaches one copy control to every code block,
// and lets the user activate them with the keyboard or mouse.
//
// Architecture:
// - dom: the element tree the augmenter operates on
// - page: markdown -> document (pulldown-cmark)
// - augment: discovery + control attachment + flash state machines
// - clipboard: tiered write protocol (system clipboard, OSC 52 fallback)
// - tui (ratatui): renders the page and routes input to controls

mod augment;
mod cli;
mod clipboard;
mod config;
mod dom;
mod events;
mod logging;
mod page;
mod tui;

use anyhow::Result;
use augment::AugmentOptions;
use clipboard::ClipboardStack;
use config::{Config, LogRotation};
use logging::{LogBuffer, TuiLogLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --edit, --path)
    // If a command was handled, exit early
    let Some(run) = cli::handle_cli() else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // Load configuration first to determine TUI vs headless mode
    let config = Config::from_env();

    // Create log buffer for TUI mode
    let log_buffer = LogBuffer::new();

    // Initialize tracing/logging with conditional output
    // In TUI mode: capture logs to buffer (prevents garbling the display)
    // In headless mode: output logs to stdout
    // File logging: optionally write to rotating log files (in addition to above)
    //
    // Precedence: RUST_LOG env var > config file > default "info"
    let default_filter = format!("codecopy={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // The guard must be kept alive for the duration of the program to
    // ensure file logs flush
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard> =
        if config.logging.file_enabled {
            if let Err(e) = std::fs::create_dir_all(&config.logging.file_dir) {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                // Fall back to non-file logging
                init_without_file_layer(&config, filter, log_buffer.clone());
                None
            } else {
                // Create rolling file appender based on configured rotation
                let file_appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Daily => tracing_appender::rolling::daily(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Never => tracing_appender::rolling::never(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                };

                // Wrap in non-blocking writer (writes happen in background thread)
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                if config.enable_tui {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .with(
                            tracing_subscriber::fmt::layer()
                                .with_writer(non_blocking)
                                .with_ansi(false),
                        )
                        .init();
                } else {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(tracing_subscriber::fmt::layer())
                        .with(
                            tracing_subscriber::fmt::layer()
                                .with_writer(non_blocking)
                                .with_ansi(false),
                        )
                        .init();
                }

                Some(guard)
            }
        } else {
            // No file logging - initialize without file layer
            init_without_file_layer(&config, filter, log_buffer.clone());
            None
        };

    // Build the page: a markdown file, or the built-in sample page
    let mut doc = match &run.file {
        Some(path) => page::load(path)?,
        None => page::sample(),
    };
    let title = page::title(&doc).unwrap_or_else(|| match &run.file {
        Some(path) => path.display().to_string(),
        None => "sample page".to_string(),
    });

    // One augmentation pass, now that the document is fully built.
    // Blocks added afterwards would not be picked up.
    let buttons = augment::augment(&mut doc, &AugmentOptions::from_config(&config));

    // Clipboard tiers, selected by capability at copy time
    let clipboard = ClipboardStack::detect(config.clipboard_tier);

    if config.enable_tui {
        tracing::info!("Starting TUI");
        let app = tui::app::App::new(doc, buttons, clipboard, log_buffer, title);
        if let Err(e) = tui::run_tui(app).await {
            tracing::error!("TUI error: {:?}", e);
        }
    } else {
        // Headless mode: report the augmentation pass and exit
        tracing::info!("TUI disabled, running headless augmentation pass");
        for (i, button) in buttons.iter().enumerate() {
            let code = doc.visible_text(button.code_node());
            tracing::info!(
                "control {}: {} line(s), {} byte(s) of code",
                i + 1,
                code.lines().count(),
                code.len()
            );
        }
    }

    Ok(())
}

/// Subscriber setup for the no-file-logging cases: TUI buffer layer in
/// TUI mode, fmt layer on stdout otherwise.
fn init_without_file_layer(config: &Config, filter: EnvFilter, log_buffer: LogBuffer) {
    if config.enable_tui {
        tracing_subscriber::registry()
            .with(filter)
            .with(TuiLogLayer::new(log_buffer))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
