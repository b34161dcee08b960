//! HafizLy TUI
//!
//! Terminal user interface for HafizLy - public/private link bookmarking.
//!
//! ## Screens
//!
//! Three tabs mirroring the mobile app:
//! - Public: public links with live search
//! - Private: private links, behind the passcode gate
//! - Settings: set or change the passcode
//!
//! ## Navigation
//!
//! - 1/2/3: Jump to a tab, Tab/Shift-Tab: cycle tabs
//! - j/k or ↑/↓: Move selection up/down
//! - Enter: Open link in browser
//! - q: Quit
//!
//! ## Commands
//!
//! - a: Add link
//! - e: Edit link
//! - d: Delete link
//! - p: Toggle Public/Private
//! - r: Refresh from the remote table
//! - /: Search current view

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hafizly_core::{Config, LinkStore, PasscodeVault, RemoteTable};

use app::{App, InputMode, Tab};

/// Run the TUI application
pub async fn run() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let Some(table_url) = config.table_url.clone() else {
        anyhow::bail!(
            "No table URL configured. Set one with:\n  \
             hafizly config set table_url https://your-project.supabase.co"
        );
    };

    let table = RemoteTable::new(
        table_url,
        &config.table,
        config.api_key.clone().unwrap_or_default(),
    )
    .context("Failed to create table client")?;
    let mut store = LinkStore::new(Arc::new(table));
    let vault = PasscodeVault::new(config.passcode_path());

    // Initialize TUI logging (file-based, only if HAFIZLY_LOG is set)
    init_tui_logging(&config);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create app and load the initial snapshot
    let mut app = App::new(config, vault);
    app.is_loading = true;
    terminal.draw(|frame| ui::draw(frame, &app, store.links()))?;
    if let Err(e) = store.refresh().await {
        app.set_error(e.user_message());
    }
    app.is_loading = false;

    // Run app
    let result = run_app(&mut terminal, &mut app, &mut store).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &mut LinkStore,
) -> Result<()> {
    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app, store.links()))?;

        // Poll for terminal events
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // If error modal is showing, any key dismisses it
                if app.has_error() {
                    app.clear_error();
                    continue;
                }

                // If help is showing, any key dismisses it
                if app.show_help {
                    app.show_help = false;
                    continue;
                }

                // Handle based on input mode
                match app.input_mode {
                    InputMode::Normal => {
                        handle_normal_mode(terminal, app, store, key.code, key.modifiers).await?
                    }
                    InputMode::Search => handle_search_mode(app, key.code),
                    InputMode::Form => {
                        handle_form_mode(terminal, app, store, key.code).await?
                    }
                    InputMode::Passcode => handle_passcode_mode(app, key.code),
                    InputMode::Settings => handle_settings_mode(app, key.code),
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
async fn handle_normal_mode<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &mut LinkStore,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    // Clear status message on navigation keys
    match code {
        KeyCode::Char('j') | KeyCode::Char('k') | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
            app.status_message = None;
        }
        _ => {}
    }

    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Tab selection
        KeyCode::Char('1') => app.select_tab(Tab::Public),
        KeyCode::Char('2') => app.select_tab(Tab::Private),
        KeyCode::Char('3') => app.select_tab(Tab::Settings),
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.visible_links(store.links()).len();
            app.move_down(len);
        }
        KeyCode::Char('g') => app.move_to_first(),
        KeyCode::Char('G') => {
            let len = app.visible_links(store.links()).len();
            app.move_to_last(len);
        }

        // Search
        KeyCode::Char('/') if app.tab != Tab::Settings => {
            app.search_text.clear();
            app.link_index = 0;
            app.input_mode = InputMode::Search;
        }

        // Add link
        KeyCode::Char('a') if app.tab != Tab::Settings => {
            app.open_add_form();
        }

        // Edit link
        KeyCode::Char('e') if app.tab != Tab::Settings => {
            if let Some(link) = app.current_link(store.links()).cloned() {
                app.open_edit_form(&link);
            }
        }

        // Delete link
        KeyCode::Char('d') if app.tab != Tab::Settings => {
            if let Some(id) = app.current_link(store.links()).map(|l| l.id) {
                show_loading(terminal, app, store)?;
                match store.delete(id).await {
                    Ok(()) => app.set_status("Link deleted"),
                    Err(e) => app.set_error(e.user_message()),
                }
                app.is_loading = false;
                let len = app.visible_links(store.links()).len();
                app.clamp_selection(len);
            }
        }

        // Toggle Public/Private
        KeyCode::Char('p') if app.tab != Tab::Settings => {
            if let Some((id, category)) = app
                .current_link(store.links())
                .map(|l| (l.id, l.category))
            {
                show_loading(terminal, app, store)?;
                match store.toggle_privacy(id, category).await {
                    Ok(()) => app.set_status(format!("Link is now {}", category.toggled())),
                    Err(e) => app.set_error(e.user_message()),
                }
                app.is_loading = false;
                let len = app.visible_links(store.links()).len();
                app.clamp_selection(len);
            }
        }

        // Refresh from remote
        KeyCode::Char('r') => {
            show_loading(terminal, app, store)?;
            match store.refresh().await {
                Ok(()) => app.set_status("Refreshed"),
                Err(e) => app.set_error(e.user_message()),
            }
            app.is_loading = false;
            let len = app.visible_links(store.links()).len();
            app.clamp_selection(len);
        }

        // Enter: open link / edit passcode on Settings
        KeyCode::Enter => {
            if app.tab == Tab::Settings {
                app.passcode_form.clear();
                app.input_mode = InputMode::Settings;
            } else if let Some(link) = app.current_link(store.links()) {
                if open::that(&link.url).is_err() {
                    app.set_status("Could not open the link");
                }
            }
        }

        // Help
        KeyCode::Char('?') => {
            app.toggle_help();
        }

        _ => {}
    }

    Ok(())
}

/// Handle key events in search mode
fn handle_search_mode(app: &mut App, code: KeyCode) {
    match code {
        // Cancel search
        KeyCode::Esc => {
            app.search_text.clear();
            app.link_index = 0;
            app.input_mode = InputMode::Normal;
        }

        // Confirm search (stay in filtered view)
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }

        // Text input
        KeyCode::Char(c) => {
            app.search_text.push(c);
            app.link_index = 0;
        }
        KeyCode::Backspace => {
            app.search_text.pop();
            app.link_index = 0;
        }

        _ => {}
    }
}

/// Handle key events in the add/edit form
async fn handle_form_mode<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &mut LinkStore,
    code: KeyCode,
) -> Result<()> {
    if app.form.is_none() {
        app.input_mode = InputMode::Normal;
        return Ok(());
    }

    match code {
        // Cancel
        KeyCode::Esc => {
            app.close_form();
        }

        // Field navigation
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.field = form.field.next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.field = form.field.prev();
            }
        }

        // Submit
        KeyCode::Enter => {
            let (draft, editing) = match app.form.as_ref() {
                Some(form) => (form.draft(), form.editing),
                None => return Ok(()),
            };

            show_loading(terminal, app, store)?;
            let result = match editing {
                Some(id) => store.update(id, &draft).await,
                None => store.add(&draft).await,
            };
            app.is_loading = false;

            match result {
                Ok(()) => {
                    app.close_form();
                    app.set_status(if editing.is_some() {
                        "Link updated"
                    } else {
                        "Link added"
                    });
                    let len = app.visible_links(store.links()).len();
                    app.clamp_selection(len);
                }
                // Leave the form open for another attempt
                Err(e) => app.set_error(e.user_message()),
            }
        }

        // Text input / visibility toggle
        KeyCode::Char(c) => {
            if let Some(form) = app.form.as_mut() {
                match form.active_buffer_mut() {
                    Some(buffer) => buffer.push(c),
                    // The visibility field has no buffer; space flips it
                    None if c == ' ' => form.is_public = !form.is_public,
                    None => {}
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form.as_mut() {
                if let Some(buffer) = form.active_buffer_mut() {
                    buffer.pop();
                }
            }
        }

        _ => {}
    }

    Ok(())
}

/// Handle key events in the Private tab's passcode prompt
fn handle_passcode_mode(app: &mut App, code: KeyCode) {
    match code {
        // Back to the Public screen
        KeyCode::Esc => {
            app.cancel_passcode();
        }

        // Try to unlock
        KeyCode::Enter => {
            app.submit_passcode();
        }

        // Text input
        KeyCode::Char(c) => {
            app.passcode_input.push(c);
        }
        KeyCode::Backspace => {
            app.passcode_input.pop();
        }

        _ => {}
    }
}

/// Handle key events in the Settings passcode form
fn handle_settings_mode(app: &mut App, code: KeyCode) {
    match code {
        // Cancel
        KeyCode::Esc => {
            app.passcode_form.clear();
            app.input_mode = InputMode::Normal;
        }

        // Field navigation
        KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
            app.passcode_form.field = app.passcode_form.field.other();
        }

        // Apply
        KeyCode::Enter => {
            app.submit_settings();
        }

        // Text input
        KeyCode::Char(c) => {
            app.passcode_form.active_buffer_mut().push(c);
        }
        KeyCode::Backspace => {
            app.passcode_form.active_buffer_mut().pop();
        }

        _ => {}
    }
}

/// Paint one frame with the loading indicator up before awaiting a remote call
fn show_loading<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &LinkStore,
) -> Result<()> {
    app.is_loading = true;
    terminal.draw(|frame| ui::draw(frame, app, store.links()))?;
    Ok(())
}

/// Initialize logging for TUI mode
///
/// Only initializes if HAFIZLY_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    // Only log if HAFIZLY_LOG is set
    let Ok(log_level) = std::env::var("HAFIZLY_LOG") else {
        return;
    };

    // Determine log file path
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| config.data_dir.join("debug.log"));

    // Create log file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "hafizly_core={},hafizly_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
