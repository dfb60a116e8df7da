//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::UiSettings;
use crate::player::{Notice, PlaybackPhase, PlaybackSession, Severity};
use crate::view::{TrackRow, format_mmss, progress_bar};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("tab".to_string(), "switch view".to_string());
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected track".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("x".to_string(), "stop".to_string());
    map.insert("h/l".to_string(), "prev/next page".to_string());
    map.insert("/".to_string(), "search".to_string());
    map.insert("o".to_string(), "order".to_string());
    map.insert("i".to_string(), "import".to_string());
    map.insert("R".to_string(), "refetch".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text.
fn controls_text(search_mode: bool) -> String {
    if search_mode {
        return "[enter] submit | [esc] cancel | type to edit the query".to_string();
    }

    // Keep the rendered order stable and human-friendly.
    let order = [
        "tab", "j/k", "h/l", "enter", "space/p", "x", "gg/G", "/", "o", "i", "R", "q",
    ];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn phase_label(session: &PlaybackSession) -> &'static str {
    match session.phase() {
        PlaybackPhase::Idle => "Stopped",
        PlaybackPhase::Loading => "Loading",
        PlaybackPhase::Playing => "Playing",
        PlaybackPhase::Paused => "Paused",
    }
}

fn notice_style(severity: Severity) -> Style {
    match severity {
        Severity::Info => Style::default(),
        Severity::Success => Style::default().fg(Color::Green),
        Severity::Warning => Style::default().fg(Color::Yellow),
        Severity::Error => Style::default().fg(Color::Red),
    }
}

fn row_item(row: &TrackRow) -> ListItem<'static> {
    let marker = if row.playing {
        "▶"
    } else if row.active {
        "●"
    } else {
        " "
    };
    let album = row
        .album
        .as_deref()
        .map(|a| format!(" ({a})"))
        .unwrap_or_default();
    let imported = if row.imported { "  ✓" } else { "" };

    let title_line = format!(
        "{} {} - {}{}  [{}]{}",
        marker, row.artist, row.title, album, row.duration_label, imported
    );

    if row.active {
        let time = row.time_label.as_deref().unwrap_or("");
        let progress_line = format!("   {} {}", progress_bar(row.progress, 24), time);
        ListItem::new(Text::from(vec![
            Line::from(title_line),
            Line::from(progress_line),
        ]))
    } else {
        ListItem::new(title_line)
    }
}

/// Render the entire UI into the provided `frame` using `app` state and
/// the live playback session.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    session: &PlaybackSession,
    rows: &[TrackRow],
    library_len: usize,
    notice: Option<&Notice>,
    ui_settings: &UiSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let surface_state = app.active_state();

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" aria ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        parts.push(format!(" VIEW: {}", app.active.title()));

        if let Some(track) = session.track() {
            let time = format!(
                "{} / {}",
                format_mmss(Some(session.position())),
                format_mmss(session.duration().or(track.duration))
            );
            parts.push(format!("Song: {} [{}]", track.display(), time));
            parts.push(phase_label(session).to_string());
        } else {
            parts.push("Stopped".to_string());
        }

        if surface_state.search_mode {
            parts.push(format!("SEARCH: {}_", surface_state.search_input));
        } else if !surface_state.query.trim().is_empty() {
            parts.push(format!("SEARCH: {}", surface_state.query));
        }

        parts.push(format!("ORDER: {}", surface_state.order.label()));

        if surface_state.loading {
            parts.push("Fetching...".to_string());
        }

        parts.push(format!("Library: {} songs", library_len));

        parts.join(" • ")
    };

    let mut status_lines: Vec<Line> = vec![Line::from(status)];
    if let Some(notice) = notice {
        status_lines.push(Line::from(Span::styled(
            format!(" {}", notice.message),
            notice_style(notice.severity),
        )));
    }

    let status_par = Paragraph::new(status_lines)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let list_block = Block::default().borders(Borders::ALL).title(format!(
            " {} / page {} ",
            app.active.title(),
            surface_state.results.page()
        ));

        if rows.is_empty() {
            let hint = if surface_state.loading {
                "Fetching from the catalog..."
            } else {
                "No results here. [/] to search, [R] to fetch again."
            };
            frame.render_widget(Paragraph::new(hint).block(list_block), chunks[2]);
        } else {
            // Center the selected item when possible by creating a visible window.
            // Important: only build ListItems for the visible window (avoid allocating the entire list).
            let total = rows.len();
            let list_height = chunks[2].height as usize;
            let sel_pos = surface_state.selected.min(total - 1);
            let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0
            {
                (0, total, sel_pos)
            } else {
                let half = list_height / 2;
                let mut start = if sel_pos > half { sel_pos - half } else { 0 };
                if start + list_height > total {
                    start = total - list_height;
                }
                (start, start + list_height, sel_pos - start)
            };

            let visible_items: Vec<ListItem> = rows[start..end].iter().map(row_item).collect();

            let list = List::new(visible_items)
                .block(list_block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ratatui::widgets::ListState::default();
            state.select(Some(selected_pos_in_visible));
            frame.render_stateful_widget(list, chunks[2], &mut state);
        }
    }

    let footer = Paragraph::new(controls_text(surface_state.search_mode))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
