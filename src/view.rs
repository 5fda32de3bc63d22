//! Schedule screen rendering.
//!
//! Rendering is a pure function of a [`ViewModel`] snapshot, so every
//! combination of resilience, layout and gesture state can be drawn into a
//! `TestBackend` without a live terminal.
//!
//! Screen layout, top to bottom:
//! - offline banner (only while offline)
//! - header with tournament name and activity indicator
//! - error panel (only while an error is stored)
//! - fixtures: a compact list on mobile tiers, a table otherwise
//! - footer with key hints, layout tier and gesture direction

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::domain::{BreakpointState, GestureState, ResilienceState, ScrollDirection};
use crate::schedule::{Fixture, FixtureStatus, LoadedSchedule};

const COLOR_BORDER: Color = Color::DarkGray;
const COLOR_DIM: Color = Color::DarkGray;
const COLOR_LIVE: Color = Color::LightGreen;
const COLOR_ERROR: Color = Color::LightRed;
const COLOR_OFFLINE: Color = Color::Yellow;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Everything one frame needs.
#[derive(Debug, Clone, Copy)]
pub struct ViewModel<'a> {
    pub resilience: &'a ResilienceState,
    pub layout: &'a BreakpointState,
    pub gesture: &'a GestureState,
    pub schedule: Option<&'a LoadedSchedule>,
    pub max_retries: u32,
    pub now: DateTime<Utc>,
    /// Animation frame counter
    pub tick: usize,
}

pub fn render(frame: &mut Frame, model: &ViewModel) {
    let area = frame.area();
    let banner_height = u16::from(!model.resilience.is_online);
    let error_height = if model.resilience.has_error() { 4 } else { 0 };

    let [banner, header, error, body, footer] = Layout::vertical([
        Constraint::Length(banner_height),
        Constraint::Length(1),
        Constraint::Length(error_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    if banner_height > 0 {
        render_offline_banner(frame, banner);
    }
    render_header(frame, header, model);
    if error_height > 0 {
        render_error_panel(frame, error, model);
    }
    render_fixtures(frame, body, model);
    render_footer(frame, footer, model);
}

fn render_offline_banner(frame: &mut Frame, area: Rect) {
    let banner = Paragraph::new(Line::from(Span::styled(
        " Offline - showing last loaded schedule ",
        Style::default()
            .fg(Color::Black)
            .bg(COLOR_OFFLINE)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(banner, area);
}

fn render_header(frame: &mut Frame, area: Rect, model: &ViewModel) {
    let title = model
        .schedule
        .map(|loaded| loaded.schedule.tournament.as_str())
        .unwrap_or("Courtside");
    let mut spans = vec![Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(loaded) = model.schedule {
        let live = loaded.schedule.live().count();
        let upcoming = loaded.schedule.upcoming(model.now).len();
        spans.push(Span::styled(
            format!("  {} live, {} upcoming", live, upcoming),
            Style::default().fg(COLOR_LIVE),
        ));
    }
    if let Some(activity) = activity_label(model.resilience, model.tick) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(activity, Style::default().fg(COLOR_DIM)));
    } else if let Some(loaded) = model.schedule {
        spans.push(Span::styled(
            format!("  updated {}", loaded.fetched_at.format("%H:%M:%S")),
            Style::default().fg(COLOR_DIM),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Spinner text while loading, a marker while refreshing.
pub fn activity_label(state: &ResilienceState, tick: usize) -> Option<String> {
    if state.is_loading {
        Some(format!("{} Loading", SPINNER[tick % SPINNER.len()]))
    } else if state.is_refreshing {
        Some("↻ Refreshing".to_string())
    } else {
        None
    }
}

fn render_error_panel(frame: &mut Frame, area: Rect, model: &ViewModel) {
    let Some(error) = &model.resilience.error else {
        return;
    };
    let lines = vec![
        Line::from(Span::styled(
            error.user_message(),
            Style::default().fg(COLOR_ERROR),
        )),
        Line::from(Span::styled(
            retry_hint(model.resilience, model.max_retries),
            Style::default().fg(COLOR_DIM),
        )),
    ];
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().border_style(Style::default().fg(COLOR_ERROR)));
    frame.render_widget(panel, area);
}

/// Key hint shown under an error.
pub fn retry_hint(state: &ResilienceState, max_retries: u32) -> String {
    if state.is_retry_exhausted() {
        "Press f to refresh or c to dismiss".to_string()
    } else if state.is_loading {
        format!("Retrying (attempt {} of {})", state.retry_count, max_retries)
    } else {
        format!(
            "Press r to retry ({} of {} used) or c to dismiss",
            state.retry_count, max_retries
        )
    }
}

fn render_fixtures(frame: &mut Frame, area: Rect, model: &ViewModel) {
    let block = Block::bordered().border_style(Style::default().fg(COLOR_BORDER));
    let Some(loaded) = model.schedule else {
        let text = if model.resilience.is_busy() {
            "Loading schedule…"
        } else {
            "No schedule loaded"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(COLOR_DIM))).block(block),
            area,
        );
        return;
    };

    let fixtures = loaded.schedule.chronological();
    if fixtures.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No fixtures scheduled",
                Style::default().fg(COLOR_DIM),
            ))
            .block(block),
            area,
        );
        return;
    }

    if model.layout.is_mobile {
        let items: Vec<ListItem> = fixtures
            .iter()
            .map(|f| ListItem::new(compact_line(f)))
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    } else {
        let rows = fixtures.iter().map(|f| {
            Row::new(vec![
                Span::raw(f.starts_at.format("%a %H:%M").to_string()),
                Span::raw(f.matchup()),
                Span::raw(f.court.clone().unwrap_or_default()),
                Span::styled(f.status.label(), status_style(f.status)),
            ])
        });
        let widths = [
            Constraint::Length(9),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(10),
        ];
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["Time", "Match", "Court", "Status"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(block);
        frame.render_widget(table, area);
    }
}

/// Single-line fixture summary for narrow screens.
pub fn compact_line(fixture: &Fixture) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            fixture.starts_at.format("%H:%M ").to_string(),
            Style::default().fg(COLOR_DIM),
        ),
        Span::raw(fixture.matchup()),
        Span::raw(" "),
        Span::styled(fixture.status.label(), status_style(fixture.status)),
    ])
}

fn status_style(status: FixtureStatus) -> Style {
    match status {
        FixtureStatus::Live => Style::default()
            .fg(COLOR_LIVE)
            .add_modifier(Modifier::BOLD),
        FixtureStatus::Postponed => Style::default().fg(COLOR_ERROR),
        FixtureStatus::Scheduled | FixtureStatus::Final => Style::default().fg(COLOR_DIM),
    }
}

fn render_footer(frame: &mut Frame, area: Rect, model: &ViewModel) {
    let mut text = format!("r retry  f refresh  c clear  q quit  [{}]", model.layout.breakpoint);
    if let Some(arrow) = direction_arrow(model.gesture) {
        text.push_str("  drag ");
        text.push_str(arrow);
    }
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(COLOR_DIM))),
        area,
    );
}

fn direction_arrow(gesture: &GestureState) -> Option<&'static str> {
    match gesture.scroll_direction {
        ScrollDirection::None => None,
        ScrollDirection::Up => Some("↑"),
        ScrollDirection::Down => Some("↓"),
        ScrollDirection::Left => Some("←"),
        ScrollDirection::Right => Some("→"),
    }
}
