use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::tracker::PlayerRow;
use crate::tui::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(frame.size());

    draw_header(frame, app, chunks[0]);
    draw_players(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);

    if let Some(message) = &app.loading_message {
        draw_loading(frame, message);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let refreshed = match (app.last_refresh, app.next_refresh()) {
        (Some(last), Some(next)) => format!(
            "updated {} | next {}",
            last.with_timezone(&chrono::Local).format("%H:%M:%S"),
            next.with_timezone(&chrono::Local).format("%H:%M:%S")
        ),
        _ => "waiting for first refresh".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            app.title.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(refreshed, Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_players(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(PlayerRow::HEADERS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows = app.rows.iter().enumerate().map(|(i, row)| {
        let [index, name, rank, progress, delta, activity, state] = row.cells();
        let delta_style = if delta.starts_with('+') {
            Style::default().fg(Color::Green)
        } else if delta.starts_with('-') {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };

        let mut style = if row.available {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if i == app.selected_row {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(index),
            Cell::from(name),
            Cell::from(rank).style(Style::default().fg(rank_color(&row.rank))),
            Cell::from(progress),
            Cell::from(delta).style(delta_style),
            Cell::from(activity),
            Cell::from(state),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Min(14),
        Constraint::Length(14),
        Constraint::Length(28),
        Constraint::Length(6),
        Constraint::Min(14),
        Constraint::Min(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Players"));
    frame.render_widget(table, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::raw("Commands: "),
        Span::styled("r", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" refresh | "),
        Span::styled("↑/↓", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" select | "),
        Span::styled("q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ])];

    if let Some(warning) = app.warnings.first() {
        let more = app.warnings.len() - 1;
        let text = if more > 0 {
            format!("{} (+{} more)", warning, more)
        } else {
            warning.clone()
        };
        lines.push(Line::from(vec![
            Span::styled("Warning: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(text, Style::default().fg(Color::Red)),
        ]));
    }

    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn draw_loading(frame: &mut Frame, message: &str) {
    let area = centered_rect(40, 20, frame.size());

    let loading = Paragraph::new(message)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Refreshing"));

    frame.render_widget(Clear, area);
    frame.render_widget(loading, area);
}

fn rank_color(rank: &str) -> Color {
    match rank.split_whitespace().next().unwrap_or_default() {
        "PREDATOR" => Color::Red,
        "MASTER" => Color::Magenta,
        "DIAMOND" => Color::Cyan,
        "PLATINUM" => Color::LightCyan,
        "GOLD" => Color::Yellow,
        "SILVER" => Color::Gray,
        "BRONZE" => Color::Rgb(205, 127, 50),
        _ => Color::White,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_color_uses_tier_word() {
        assert_eq!(rank_color("GOLD II"), Color::Yellow);
        assert_eq!(rank_color("PREDATOR"), Color::Red);
        assert_eq!(rank_color("unavailable"), Color::White);
    }
}
