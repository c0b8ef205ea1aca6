//! Frame rendering for the scan station.
//!
//! Layout: header bar, slot banner, the scan box (border color signals
//! state, like the web client's), recent-scan panel, footer hints.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use mealgate_core::ScanOutcome;

use crate::app::App;
use crate::theme;

pub fn render(frame: &mut Frame, app: &App) {
    let [header, banner, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, app);
    render_banner(frame, banner, app);
    render_scan_box(frame, body, app);
    render_footer(frame, footer, app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " mealgate ",
            Style::default()
                .fg(theme::GREEN_LIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("meals", Style::default().fg(theme::TEXT)),
    ];
    if app.pending > 0 {
        spans.push(Span::styled(
            format!("   {} in flight", app.pending),
            Style::default().fg(theme::SLATE),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_banner(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(status) = app.access_denied {
        Line::styled(
            format!("You don't have access (HTTP {status})"),
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        )
    } else if let Some(slot) = &app.current_slot {
        Line::styled(
            format!("Scan Meals — {slot}"),
            Style::default()
                .fg(theme::GREEN_LIGHT)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Line::styled(
            "No meals available at this time",
            Style::default().fg(theme::SLATE),
        )
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Border color mirrors the web client: dim when unfocused, green once
/// scans have landed, slate while armed but empty.
fn border_color(app: &App) -> ratatui::style::Color {
    if !app.focused {
        theme::DIM
    } else if !app.recent.is_empty() {
        theme::GREEN
    } else {
        theme::SLATE
    }
}

fn render_scan_box(frame: &mut Frame, area: Rect, app: &App) {
    let title = if app.capture.is_enabled() {
        " Scanning "
    } else {
        " Scanning off "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color(app)))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = &app.error {
        lines.push(Line::styled(
            format!("Error: {error}"),
            Style::default().fg(theme::RED),
        ));
        lines.push(Line::raw(""));
    }

    if app.capture.is_paused() {
        lines.push(Line::styled(
            "Scanning Paused",
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(
            "Refocus the terminal to resume",
            Style::default().fg(theme::SLATE),
        ));
    } else if !app.capture.is_enabled() {
        lines.push(Line::styled(
            "Press F2 to start scanning",
            Style::default().fg(theme::SLATE),
        ));
    } else if app.recent.is_empty() {
        lines.push(Line::styled(
            "Scan away!",
            Style::default().fg(theme::SLATE).add_modifier(Modifier::BOLD),
        ));
    } else {
        for resolution in app.recent.iter().take(inner.height as usize) {
            lines.push(scan_line(resolution));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

fn scan_line(resolution: &mealgate_core::ScanResolution) -> Line<'static> {
    let record = &resolution.record;
    let (status, color) = match &record.outcome {
        ScanOutcome::Approved { slot } => (format!("approved {slot}"), theme::GREEN_LIGHT),
        ScanOutcome::AlreadyUsed { slot } => (format!("already used {slot}"), theme::RED),
        ScanOutcome::NoActiveSlot => ("no active meal".to_owned(), theme::SLATE),
    };
    let mut spans = vec![
        Span::styled(
            record.at.format("%H:%M:%S ").to_string(),
            Style::default().fg(theme::DIM),
        ),
        Span::styled(
            record.identifier.clone(),
            Style::default().fg(theme::TEXT),
        ),
        Span::raw("  "),
        Span::styled(status, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ];
    if resolution.deduplicated {
        spans.push(Span::styled(
            "  (repeat)",
            Style::default().fg(theme::DIM),
        ));
    }
    Line::from(spans)
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hint = if app.capture.is_enabled() {
        " F2 stop scanning · Esc quit"
    } else {
        " F2 start scanning · q quit"
    };
    frame.render_widget(
        Paragraph::new(Line::styled(hint, Style::default().fg(theme::DIM))),
        area,
    );
}
