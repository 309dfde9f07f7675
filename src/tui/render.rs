use std::borrow::Cow;

use super::config_view::ConfigViewState;
use super::state::{AppState, Modal, ViewState};
use crate::card::PostCard;
use crate::feed::filter::{PAINTING, PHOTOGRAPH};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Rows each card occupies, borders included.
const CARD_HEIGHT: u16 = 8;

pub fn draw(f: &mut Frame, state: &AppState, view: &ViewState, spinner_frame: u8) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, state, chunks[0], spinner_frame);
    draw_feed(f, state, view, chunks[1], spinner_frame);
    draw_logs(f, state, chunks[2]);
    draw_footer(f, chunks[3]);

    match &view.modal {
        Some(Modal::Details { title, links }) => {
            let lines = vec![
                Line::from(Span::styled(
                    title.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::raw(""),
                Line::from(Span::styled("Ask about this work:", Style::default().fg(Color::Yellow))),
                Line::raw(links.about_work.as_str()),
                Line::raw(""),
                Line::from(Span::styled("Ask about this artist:", Style::default().fg(Color::Yellow))),
                Line::raw(links.about_artist.as_str()),
            ];
            let area = centered_rect(70, 50, f.area());
            f.render_widget(Clear, area);
            let para = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" More information "));
            f.render_widget(para, area);
        }
        Some(Modal::Config(cv)) => render_config(f, cv),
        None => {}
    }
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let mut types = Vec::new();
    if state.filters.includes_type(PAINTING) {
        types.push("paintings");
    }
    if state.filters.includes_type(PHOTOGRAPH) {
        types.push("photographs");
    }
    let years = match (state.filters.min_year, state.filters.max_year) {
        (None, None) => String::new(),
        (min, max) => format!(
            " \u{00b7} {}\u{2013}{}",
            min.map(|y| y.to_string()).unwrap_or_default(),
            max.map(|y| y.to_string()).unwrap_or_default()
        ),
    };

    let activity = if state.loading {
        let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
        Span::styled(format!(" {} loading", ch), Style::default().fg(Color::Cyan))
    } else {
        Span::raw("")
    };

    let line = Line::from(vec![
        Span::styled(" Grambrandt ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(
                "| {} posts \u{00b7} {} seen \u{00b7} {}{}{} | up {}",
                state.posts.len(),
                state.seen_count,
                types.join(" + "),
                if state.filters.show_obscure { " \u{00b7} obscure" } else { "" },
                years,
                state.uptime(),
            ),
            Style::default().fg(Color::DarkGray),
        ),
        activity,
    ]);

    let para = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_feed(f: &mut Frame, state: &AppState, view: &ViewState, area: Rect, spinner_frame: u8) {
    if state.posts.is_empty() {
        let msg = if state.loading {
            let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
            format!("{} Loading artworks...", ch)
        } else {
            "Nothing to show. Press [j] to try again or [c] to change filters.".to_string()
        };
        let para = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(para, area);
        return;
    }

    let per_screen = (area.height / CARD_HEIGHT).max(1) as usize;
    let start = if view.selected >= per_screen {
        view.selected + 1 - per_screen
    } else {
        0
    };

    let constraints: Vec<Constraint> = (0..per_screen)
        .map(|_| Constraint::Length(CARD_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (slot, (idx, card)) in slots
        .iter()
        .zip(state.posts.iter().enumerate().skip(start).take(per_screen))
    {
        draw_card(f, card, view, idx == view.selected, *slot);
    }
}

fn draw_card(f: &mut Frame, card: &PostCard, view: &ViewState, selected: bool, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize;
    let (r, g, b) = card.avatar_rgb();
    let liked = view.liked.contains(&card.id);

    let mut header = vec![
        Span::styled(
            format!(" {} ", card.avatar_initials),
            Style::default().bg(Color::Rgb(r, g, b)).fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(card.artist_name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if !card.place_of_origin.is_empty() {
        header.push(Span::styled(
            format!("  {}", card.place_of_origin),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let image = card.image_url.as_deref().unwrap_or("(no image)");
    let like_style = if liked {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let lines = vec![
        Line::from(header),
        Line::from(Span::styled(
            truncate_with_ellipsis(image, max_width).into_owned(),
            Style::default().fg(Color::Blue),
        )),
        Line::from(vec![
            Span::styled(format!("\u{2665} {}", view.like_count(card)), like_style),
            Span::raw(format!("   \u{25ef} {}   \u{27a4} {}", card.comments, card.shares)),
        ]),
        Line::from(vec![
            Span::styled(format!("{} ", card.username), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(card.title.as_str(), Style::default().add_modifier(Modifier::ITALIC)),
            Span::raw(format!(", {}", card.caption)),
        ]),
        Line::from(Span::styled(
            card.years_ago.clone().unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let border = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(border));
    f.render_widget(para, area);
}

fn draw_logs(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize;
    let visible_lines = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible_lines)
        .map(|l| {
            let color = match l.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                "SHARE" => Color::Cyan,
                _ => Color::DarkGray,
            };
            let prefix = format!(" {} [{}] ", l.time, l.level);
            let msg_max = max_width.saturating_sub(prefix.len());
            let msg = truncate_with_ellipsis(&l.message, msg_max);
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ])
        })
        .collect();

    let para = Paragraph::new(lines).block(Block::default().title(" Activity ").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let line = Line::from(vec![
        key("  [q]"),
        Span::raw("uit  "),
        key("[j/k]"),
        Span::raw(" scroll  "),
        key("[l]"),
        Span::raw("ike  "),
        key("[s]"),
        Span::raw("hare  "),
        key("[i]"),
        Span::raw("nfo  "),
        key("[c]"),
        Span::raw("onfig  "),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_config(f: &mut Frame, cv: &ConfigViewState) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let rows: Vec<Row> = cv
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let value_str = if cv.editing && i == cv.selected {
                format!("{}\u{258f}", cv.edit_buffer)
            } else {
                value
            };
            let value_style = if i == cv.selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![Cell::from(label), Cell::from(value_str).style(value_style)])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .block(Block::default().borders(Borders::ALL).title(" Filters "))
        .row_highlight_style(Style::default().bg(Color::DarkGray));
    let mut table_state = TableState::default();
    table_state.select(Some(cv.selected));
    f.render_stateful_widget(table, chunks[0], &mut table_state);

    let notice = cv.notice.as_deref().unwrap_or("");
    f.render_widget(
        Paragraph::new(notice).style(Style::default().fg(Color::Yellow)),
        chunks[1],
    );

    let help = if cv.editing {
        " Enter: confirm | Esc: cancel | Type a year, empty for any "
    } else {
        " \u{2191}\u{2193}: fields | Enter/Space: toggle or edit | Esc/c: apply and close "
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
