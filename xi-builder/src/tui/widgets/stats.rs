// Batter stats card.
//
// A failed lookup keeps the previous card and shows the error above it.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::BatterStats;
use crate::protocol::PageSnapshot;
use crate::request::RequestStatus;
use crate::tui::widgets::estimate::{error_line, placeholder};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    page: &PageSnapshot,
    status: RequestStatus,
    stats: Option<&BatterStats>,
) {
    let block = Block::default().borders(Borders::ALL).title("Batter Stats");

    let mut lines = Vec::new();
    if let Some(error) = &page.error {
        if stats.is_some() {
            lines.push(error_line(error));
            lines.push(Line::default());
        }
    }
    match stats {
        Some(stats) => {
            if status == RequestStatus::Pending {
                lines.push(Line::from(Span::styled(
                    " Loading...",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.extend(card_lines(stats));
        }
        None => lines.push(placeholder(status, page, "Search for a batter to see their stats.")),
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn card_lines(stats: &BatterStats) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {name:<16}"), label),
            Span::raw(value),
        ])
    };

    vec![
        Line::from(Span::styled(
            format!(" {}", stats.batter),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        field("Matches", stats.total_mat.to_string()),
        field("Runs", stats.total_runs.to_string()),
        field("Balls faced", stats.balls_faced.to_string()),
        field("Strike rate", format!("{:.2}", stats.strike_rate)),
        field("Highest", stats.highest_run.to_string()),
        field("50s / 100s", format!("{} / {}", stats.half_centuries, stats.centuries)),
        Line::default(),
        field("Recent scores", format_recent(&stats.recent_scores)),
        field("Recent average", format!("{:.2}", stats.average_recent)),
        field("Recent total", stats.total_recent.to_string()),
        Line::from(vec![
            Span::styled(format!(" {:<16}", "Trend"), label),
            Span::styled(stats.trend.clone(), trend_style(&stats.trend)),
        ]),
    ]
}

/// "45, 12, 78" or "--" when there are no recent innings.
pub fn format_recent(scores: &[i64]) -> String {
    if scores.is_empty() {
        return "--".to_string();
    }
    scores
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn trend_style(trend: &str) -> Style {
    let lower = trend.to_lowercase();
    if lower.contains("up") || lower.contains("improv") {
        Style::default().fg(Color::Green)
    } else if lower.contains("down") || lower.contains("declin") {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
