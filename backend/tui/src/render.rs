//! TUI Rendering
//!
//! Translates `AppState` into Ratatui `Widget`s and draws to the terminal frame.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use receiptdesk_core::{Category, DraftField};

use crate::app::{AppState, StatusKind};

const KEY_HINTS: &str =
    "Tab/Shift-Tab move  ←/→ category  Ctrl-O open  Ctrl-E extract  Ctrl-S submit  Esc quit";

/// Main draw function.
pub fn draw_ui(f: &mut Frame, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(10),   // Preview + form
            Constraint::Length(3), // Status / prompt
        ])
        .split(f.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    draw_preview(f, state, columns[0]);
    draw_form(f, state, columns[1]);
    draw_status(f, state, rows[1]);
}

fn draw_preview(f: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().title("Receipt").borders(Borders::ALL);

    let Some(handle) = state.form.preview() else {
        let empty = Paragraph::new("No receipt selected. Press Ctrl-O to choose an image.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let file_name = state
        .form
        .image()
        .map(|img| img.file_name.as_str())
        .unwrap_or_default();
    let mut lines = vec![
        Line::from(Span::styled(file_name, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(format!("{}  {} bytes", handle.mime_type(), handle.bytes().len())),
        Line::from(Span::styled(handle.url(), Style::default().fg(Color::DarkGray))),
        Line::default(),
    ];
    if state.thumbnail.is_empty() {
        lines.push(Line::from("(preview unavailable)"));
    } else {
        lines.extend(state.thumbnail.iter().map(|row| Line::from(row.as_str())));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_form(f: &mut Frame, state: &AppState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),    // Extracted text
            Constraint::Length(3), // Amount
            Constraint::Length(3), // Date
            Constraint::Length(3), // Category
            Constraint::Length(3), // Merchant
            Constraint::Length(3), // Notes
        ])
        .split(area);

    let draft = state.form.draft();
    let text = Paragraph::new(draft.text.as_str())
        .wrap(Wrap { trim: false })
        .block(Block::default().title(field_title(DraftField::Text)).borders(Borders::ALL));
    f.render_widget(text, rows[0]);

    let fields = [
        DraftField::Amount,
        DraftField::Date,
        DraftField::Category,
        DraftField::Name,
        DraftField::Notes,
    ];
    for (field, area) in fields.into_iter().zip(rows.iter().skip(1)) {
        let value = if field == DraftField::Category {
            category_display(draft.get(field))
        } else {
            draft.get(field).to_string()
        };
        let focused = state.focus == field && state.path_prompt.is_none();
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let widget = Paragraph::new(value).block(
            Block::default()
                .title(field_title(field))
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(widget, *area);
    }
}

fn draw_status(f: &mut Frame, state: &AppState, area: Rect) {
    if let Some(buffer) = &state.path_prompt {
        let prompt = Paragraph::new(format!("{buffer}_"))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Open receipt (Enter to load, Esc to cancel)").borders(Borders::ALL));
        f.render_widget(prompt, area);
        return;
    }

    let (text, style) = if state.form.is_loading() {
        ("Processing...".to_string(), Style::default().fg(Color::Cyan))
    } else if let Some(status) = &state.status {
        let color = match status.kind {
            StatusKind::Info => Color::Green,
            StatusKind::Error => Color::Red,
        };
        (status.text.clone(), Style::default().fg(color))
    } else {
        ("Ready".to_string(), Style::default())
    };

    let widget = Paragraph::new(text)
        .style(style)
        .block(Block::default().title(KEY_HINTS).borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn field_title(field: DraftField) -> String {
    if field.is_required() {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    }
}

fn category_display(raw: &str) -> String {
    match raw.parse::<Category>() {
        Ok(category) => format!("‹ {} {} ›", category.emoji(), category),
        Err(_) if raw.is_empty() => "‹ Select a category ›".to_string(),
        Err(_) => format!("‹ {raw} (not a category) ›"),
    }
}
