use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::session::{presets, Verdict, SessionView};
use crate::tui::app::{App, InputMode};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App, view: &SessionView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Main content
                Constraint::Length(3), // Input
                Constraint::Length(1), // Status bar
            ]
            .as_ref(),
        )
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let content_chunks = if app.show_verdicts {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
            .split(chunks[1])
    } else {
        std::rc::Rc::new([chunks[1], Rect::default()])
    };

    render_transcript(frame, content_chunks[0], app, view);

    if app.show_verdicts {
        render_side_panel(frame, content_chunks[1], view);
    }

    render_input(frame, chunks[2], app, view);
    render_status_bar(frame, chunks[3], app, view);
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_text = vec![Line::from(vec![
        Span::styled(
            "SkinChat",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Service: "),
        Span::styled(&app.service_url, Style::default().fg(Color::Green)),
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Render the conversation, oldest exchange first
fn render_transcript(frame: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let mut lines = Vec::new();

    for entry in &view.transcript {
        let exchange = entry.render();
        let user_color = if exchange.is_image {
            Color::Magenta
        } else {
            Color::Blue
        };

        lines.push(Line::from(vec![
            Span::styled(
                "[You] ",
                Style::default().fg(user_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(exchange.user),
        ]));
        lines.push(Line::from(vec![
            Span::styled(
                "[Assistant] ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(exchange.bot.to_string()),
        ]));
        lines.push(Line::from(""));
    }

    if view.text_in_flight {
        lines.push(pending_line("Analysing symptoms"));
    }
    if view.image_in_flight {
        lines.push(pending_line("Analysing image"));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Describe your symptoms, or pick a suggestion with 1-9.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Rows after wrapping, measured inside the borders
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = wrapped_rows(&paragraph, area.width.saturating_sub(2));

    // scroll_offset counts up from the newest row
    let visible = area.height.saturating_sub(2);
    let top = total
        .saturating_sub(visible)
        .saturating_sub(app.scroll_offset);

    let paragraph = paragraph
        .block(
            Block::default()
                .title(format!("Conversation [{}]", view.transcript.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .scroll((top, 0));

    frame.render_widget(paragraph, area);
}

fn wrapped_rows(paragraph: &Paragraph, width: u16) -> u16 {
    u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX)
}

fn pending_line(label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            "  ▋ ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::styled(
            format!("{}...", label),
            Style::default()
                .fg(Color::Rgb(150, 150, 150))
                .add_modifier(Modifier::ITALIC),
        ),
    ])
}

/// Render the latest verdicts and the suggestion list
fn render_side_panel(frame: &mut Frame, area: Rect, view: &SessionView) {
    let mut items = vec![
        ListItem::new(Line::from(Span::styled(
            "Latest verdicts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))),
        verdict_item("Symptoms", view.text_verdict.as_ref()),
        verdict_item("Image", view.image_verdict.as_ref()),
        ListItem::new(""),
        ListItem::new(Line::from(Span::styled(
            "Suggestions",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))),
    ];

    for (idx, prompt) in presets().iter().enumerate() {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("{} ", idx + 1), Style::default().fg(Color::Cyan)),
            Span::raw(*prompt),
        ])));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title("Results ")
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(list, area);
}

fn verdict_item(label: &'static str, verdict: Option<&Verdict>) -> ListItem<'static> {
    let value = match verdict {
        Some(verdict) => Span::raw(verdict.as_str().to_string()),
        None => Span::styled("-", Style::default().fg(Color::DarkGray)),
    };
    ListItem::new(Line::from(vec![Span::raw(format!("{}: ", label)), value]))
}

/// Render the input area
fn render_input(frame: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let (text, title, border_color) = match app.mode {
        InputMode::Command => (
            format!(":{}", app.command),
            " Enter Command ".to_string(),
            Color::Yellow,
        ),
        _ => {
            let title = match &view.pending_image {
                Some(image) => format!(" Symptoms (image ready: {} • u to upload) ", image.name),
                None => " Symptoms (Enter to send • Esc then :help for commands) ".to_string(),
            };
            let color = if app.mode == InputMode::Insert {
                Color::Cyan
            } else {
                Color::DarkGray
            };
            (view.pending_text.clone(), title, color)
        }
    };

    let cursor_offset = text.chars().count();
    let input = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title),
        );

    frame.render_widget(input, area);

    if app.mode != InputMode::Normal {
        let cursor_x = area.x + 1 + cursor_offset as u16;
        let cursor_x = cursor_x.min(area.x + area.width.saturating_sub(2));
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let (mode_str, mode_color) = match app.mode {
        InputMode::Normal => ("NORMAL", Color::Blue),
        InputMode::Insert => ("INSERT", Color::Green),
        InputMode::Command => ("COMMAND", Color::Yellow),
    };

    let status_text = if let Some(status) = &app.status_message {
        status.clone()
    } else if view.text_in_flight || view.image_in_flight {
        "Waiting for the service...".to_string()
    } else {
        "Ready".to_string()
    };

    let spans = vec![
        Span::styled(
            format!(" {} ", mode_str),
            Style::default()
                .bg(mode_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(status_text),
        Span::raw(" | "),
        Span::styled("Ctrl+C: quit", Style::default().fg(Color::DarkGray)),
    ];

    let status_bar = Paragraph::new(vec![Line::from(spans)])
        .style(Style::default().bg(Color::Black))
        .block(Block::default());

    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::service::{MockPredictionService, Prediction, ServiceReply};
    use crate::session::SessionController;
    use ratatui::{backend::TestBackend, Terminal};
    use std::io::Write;
    use std::sync::Arc;

    const FILLER: &str = "this reply is long enough to wrap across several rows of a narrow \
                          conversation pane before it finally names";

    fn long_reply_service() -> MockPredictionService {
        let mut mock = MockPredictionService::new();
        mock.expect_chat().returning(|request| {
            let n = request.message.trim_start_matches("symptoms ");
            Ok(ServiceReply::Prediction(Prediction::new(
                format!("{} LABEL{}", FILLER, n),
                Some(90.0),
            )))
        });
        mock
    }

    async fn send(session: &SessionController, message: &str) {
        session.set_pending_text(message);
        session.send_text().await;
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let view = app.session.snapshot();
        terminal.draw(|f| render_ui(f, app, &view)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        screen
    }

    #[tokio::test]
    async fn test_newest_reply_visible_after_wrapping() {
        let session = SessionController::new(Arc::new(long_reply_service()));
        for n in 1..=6 {
            send(&session, &format!("symptoms {}", n)).await;
        }

        let mut app = App::new(session, &Config::default());
        app.show_verdicts = false;

        let screen = draw(&app, 80, 24);
        assert!(screen.contains("LABEL6"), "newest reply off screen:\n{}", screen);
        assert!(!screen.contains("LABEL1"));

        app.scroll_up(200);
        let screen = draw(&app, 80, 24);
        assert!(screen.contains("symptoms 1"));
        assert!(!screen.contains("LABEL6"));
    }

    #[tokio::test]
    async fn test_transcript_in_insertion_order() {
        let session = SessionController::new(Arc::new(long_reply_service()));
        send(&session, "symptoms 1").await;
        send(&session, "symptoms 2").await;

        let app = App::new(session, &Config::default());
        let screen = draw(&app, 200, 30);

        let first = screen.find("symptoms 1").unwrap();
        let first_reply = screen.find("LABEL1").unwrap();
        let second = screen.find("symptoms 2").unwrap();
        let second_reply = screen.find("LABEL2").unwrap();
        assert!(first < first_reply);
        assert!(first_reply < second);
        assert!(second < second_reply);
        assert!(screen.contains("Conversation [2]"));
    }

    #[tokio::test]
    async fn test_verdict_pane_shows_both_channels() {
        let mut mock = MockPredictionService::new();
        mock.expect_chat()
            .returning(|_| Ok(ServiceReply::Prediction(Prediction::new("Eczema", Some(85.5)))));
        mock.expect_predict_image()
            .returning(|_| Ok(ServiceReply::Prediction(Prediction::new("Milia", Some(95.0)))));

        let session = SessionController::new(Arc::new(mock));
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png").unwrap();
        session.select_image(file.path()).await.unwrap();
        session.upload_image().await;
        send(&session, "red rash").await;

        let app = App::new(session, &Config::default());
        let screen = draw(&app, 200, 30);

        assert!(screen.contains("Symptoms: Eczema (Confidence: 85.50%)"));
        assert!(screen.contains("Image: Milia (Confidence: 95.00%)"));
    }

    #[test]
    fn test_empty_session_shows_placeholders() {
        let session = SessionController::new(Arc::new(MockPredictionService::new()));
        let app = App::new(session, &Config::default());
        let screen = draw(&app, 200, 30);

        assert!(screen.contains("Describe your symptoms"));
        assert!(screen.contains("Symptoms: -"));
        assert!(screen.contains("Image: -"));
        assert!(screen.contains("INSERT"));
    }
}
