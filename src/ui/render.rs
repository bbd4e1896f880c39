use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

use super::app::{format_points, format_window, placement_label, self_placement, truncate, MenuState};
use crate::selector::{FetchStatus, TimeframeSelector};
use crate::types::{Partition, Selection, Slot};

const LOADING_TEXT: &str = "Loading users...";
const EMPTY_TEXT: &str = "No users found for this timeframe!";

pub fn render(f: &mut Frame, selector: &TimeframeSelector, menu: &MenuState, now: DateTime<Utc>) {
    let area = f.area();

    // header | body | notification | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(if selector.notification().is_some() { 3 } else { 0 }),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, selector, chunks[0]);
    render_body(f, selector, chunks[1]);
    if let Some(message) = selector.notification() {
        render_notification(f, message, chunks[2]);
    }
    render_footer(f, selector, chunks[3]);

    if menu.open {
        render_menu(f, selector, menu, now, chunks[1]);
    }
}

fn render_header(f: &mut Frame, selector: &TimeframeSelector, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " Leaderboard  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ▾", selector.timeframe_label()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("   {}", format_window(&selector.window())),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, selector: &TimeframeSelector, area: Rect) {
    let partition = match selector.status() {
        FetchStatus::Loading => return render_placeholder(f, LOADING_TEXT, area),
        FetchStatus::Failed => return render_placeholder(f, EMPTY_TEXT, area),
        FetchStatus::Loaded(p) if p.is_empty() => return render_placeholder(f, EMPTY_TEXT, area),
        FetchStatus::Loaded(p) => p,
    };

    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    render_podium(f, partition, halves[0]);
    render_rest(f, partition, halves[1]);
}

fn render_placeholder(f: &mut Frame, text: &str, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(paragraph, area);
}

fn render_podium(f: &mut Frame, partition: &Partition, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(area);

    for (slot, column) in partition.podium.iter().zip(columns.iter()) {
        render_podium_card(f, slot, *column);
    }
}

fn render_podium_card(f: &mut Frame, slot: &Slot, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let (lines, border) = match slot {
        Slot::Ranked(e) => {
            let name_style = if e.is_self {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            };
            let name = if e.is_self {
                format!("{} (you)", e.display_name)
            } else {
                e.display_name.clone()
            };
            let mut lines = vec![
                Line::from(Span::styled(truncate(&name, width), name_style)),
                Line::from(Span::styled(
                    format!("{} pts", format_points(e.points)),
                    Style::default().fg(Color::Green),
                )),
                Line::from(Span::styled(
                    format!("rank {}", e.rank),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            if !e.image.is_empty() {
                lines.push(Line::from(Span::styled(
                    truncate(&e.image, width),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
            (lines, podium_color(e.placement))
        }
        Slot::Invalid { display_name, error, .. } => {
            let lines = vec![
                Line::from(Span::raw(truncate(display_name, width))),
                Line::from(Span::styled(
                    truncate(&format!("⚠ {error}"), width),
                    Style::default().fg(Color::Red),
                )),
            ];
            (lines, Color::Red)
        }
    };

    let card = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                format!(" {} ", placement_label(slot.placement())),
                Style::default().fg(border).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(card, area);
}

fn podium_color(placement: usize) -> Color {
    match placement {
        1 => Color::Yellow,
        2 => Color::Gray,
        _ => Color::LightRed,
    }
}

fn render_rest(f: &mut Frame, partition: &Partition, area: Rect) {
    let header_cells = ["#", "Name", "Points", "Rank"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = partition
        .rest
        .iter()
        .map(|slot| match slot {
            Slot::Ranked(e) => {
                let style = if e.is_self {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(e.placement.to_string()).style(Style::default().fg(Color::DarkGray)),
                    Cell::from(e.display_name.clone()),
                    Cell::from(format_points(e.points)).style(Style::default().fg(Color::Green)),
                    Cell::from(e.rank.to_string()),
                ])
                .style(style)
            }
            Slot::Invalid { placement, display_name, error, .. } => Row::new(vec![
                Cell::from(placement.to_string()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(display_name.clone()),
                Cell::from(format!("⚠ {error}")).style(Style::default().fg(Color::Red)),
                Cell::from("—"),
            ]),
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(24),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " 4TH AND BEYOND ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn render_notification(f: &mut Frame, message: &str, area: Rect) {
    let line = Line::from(vec![
        Span::styled("✗ ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled(message.to_string(), Style::default().fg(Color::White)),
        Span::styled("  [d] dismiss", Style::default().fg(Color::DarkGray)),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(paragraph, area);
}

fn render_menu(f: &mut Frame, selector: &TimeframeSelector, menu: &MenuState, now: DateTime<Utc>, area: Rect) {
    let labels = selector.menu(now);
    let height = (labels.len() as u16 + 2).min(area.height);
    let width = 24.min(area.width);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y,
        width,
        height,
    };

    let items: Vec<ListItem> = labels
        .iter()
        .map(|label| {
            let style = if Selection::from_label(label) == *selector.selection() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(label.clone(), style)))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Timeframe "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(Some(menu.cursor));

    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut state);
}

fn render_footer(f: &mut Frame, selector: &TimeframeSelector, area: Rect) {
    let mut spans = vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[t] ", Style::default().fg(Color::Yellow)),
        Span::raw("timeframe  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("[↑↓ / j k] ", Style::default().fg(Color::Yellow)),
        Span::raw("move  "),
    ];
    if let Some(placement) = self_placement(selector) {
        spans.push(Span::styled(
            format!("you: {}", placement_label(placement)),
            Style::default().fg(Color::Cyan),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
