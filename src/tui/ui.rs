use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::constants::{UI_EVENT_CHANNEL_CAPACITY, UI_REFRESH_INTERVAL_MS, UI_SCROLL_LINES};
use crate::session::{Channel, DispatchOutcome};
use crate::tui::render::render_ui;
use crate::tui::{App, InputMode};
use crate::utils::SkinChatError;

const HELP_TEXT: &str = "i: type  Enter: send  1-9: suggestion  u: upload  :image <path>  :help  q: quit";

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("❌ skinchat requires an interactive terminal.");
        eprintln!("   Use --message or --image for non-interactive runs.");
        return Err(SkinChatError::UIError("No interactive terminal available".to_string()).into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Completed dispatches come back on this channel
    let (tx, mut rx) = mpsc::channel::<DispatchOutcome>(UI_EVENT_CHANNEL_CAPACITY);

    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::Sender<DispatchOutcome>,
    rx: &mut mpsc::Receiver<DispatchOutcome>,
) -> Result<()> {
    loop {
        let view = app.session.snapshot();
        terminal.draw(|f| render_ui(f, app, &view))?;

        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
                    app.quit();
                } else {
                    handle_key(app, key, &tx).await;
                }
            }
        }

        while let Ok(outcome) = rx.try_recv() {
            app.report(&outcome);
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<DispatchOutcome>) {
    match app.mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('i') => {
                app.mode = InputMode::Insert;
                app.clear_status();
            }
            KeyCode::Char(':') => {
                app.mode = InputMode::Command;
                app.command.clear();
            }
            KeyCode::Char('u') => spawn_dispatch(app, Channel::Image, tx),
            KeyCode::Char('v') => app.toggle_verdicts(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                app.apply_preset(index);
            }
            KeyCode::Up => app.scroll_up(1),
            KeyCode::Down => app.scroll_down(1),
            KeyCode::PageUp => app.scroll_up(UI_SCROLL_LINES * 5),
            KeyCode::PageDown => app.scroll_down(UI_SCROLL_LINES * 5),
            _ => {}
        },
        InputMode::Insert => match key.code {
            KeyCode::Esc => app.mode = InputMode::Normal,
            KeyCode::Enter => spawn_dispatch(app, Channel::Text, tx),
            KeyCode::Char(c) => app.session.edit_pending_text(|text| text.push(c)),
            KeyCode::Backspace => app.session.edit_pending_text(|text| {
                text.pop();
            }),
            KeyCode::PageUp => app.scroll_up(UI_SCROLL_LINES),
            KeyCode::PageDown => app.scroll_down(UI_SCROLL_LINES),
            _ => {}
        },
        InputMode::Command => match key.code {
            KeyCode::Esc => {
                app.mode = InputMode::Normal;
                app.command.clear();
            }
            KeyCode::Enter => {
                let command = std::mem::take(&mut app.command);
                app.mode = InputMode::Normal;
                handle_command(app, &command, tx).await;
            }
            KeyCode::Char(c) => app.command.push(c),
            KeyCode::Backspace => {
                if app.command.pop().is_none() {
                    app.mode = InputMode::Normal;
                }
            }
            _ => {}
        },
    }
}

/// Run one channel's dispatch on its own task
fn spawn_dispatch(app: &mut App, channel: Channel, tx: &mpsc::Sender<DispatchOutcome>) {
    let session = app.session.clone();
    let tx = tx.clone();

    app.set_status(match channel {
        Channel::Text => "Analysing symptoms...",
        Channel::Image => "Analysing image...",
    });

    tokio::spawn(async move {
        let outcome = match channel {
            Channel::Text => session.send_text().await,
            Channel::Image => session.upload_image().await,
        };
        let _ = tx.send(outcome).await;
    });
}

async fn handle_command(app: &mut App, command: &str, tx: &mpsc::Sender<DispatchOutcome>) {
    let (name, arg) = match command.trim().split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command.trim(), ""),
    };

    match name {
        "quit" | "q" => app.quit(),
        "image" | "img" => {
            if arg.is_empty() {
                app.set_status("Usage: :image <path>");
                return;
            }
            match app.session.select_image(arg).await {
                Ok(reference) => {
                    app.set_status(format!("Selected {}, press u to upload", reference.name))
                }
                Err(e) => app.set_status(e.to_string()),
            }
        }
        "upload" | "u" => spawn_dispatch(app, Channel::Image, tx),
        "clear-image" => {
            app.session.clear_image_selection();
            app.set_status("Image selection cleared");
        }
        "preset" | "p" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => app.apply_preset(n - 1),
            _ => app.set_status("Usage: :preset <number>"),
        },
        "verdicts" => app.toggle_verdicts(),
        "help" | "h" => app.set_status(HELP_TEXT),
        "" => {}
        _ => app.set_status(format!("Unknown command: {}", command)),
    }
}
