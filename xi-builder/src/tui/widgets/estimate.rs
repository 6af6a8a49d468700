// Results widgets for the squad pages.
//
// Fantasy: total points, C/VC bonuses, rank range, per-player points, verdict.
// Performance: predicted runs and wickets per player plus a team summary.
// A failed request shows its message in red above whatever result is kept.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::api::{FantasyEstimate, PerformancePrediction};
use crate::protocol::{PageSnapshot, PanelError};
use crate::request::RequestStatus;

pub fn render_fantasy(
    frame: &mut Frame,
    area: Rect,
    page: &PageSnapshot,
    status: RequestStatus,
    estimate: Option<&FantasyEstimate>,
) {
    let block = Block::default().borders(Borders::ALL).title("Fantasy Points");

    let Some(estimate) = estimate else {
        let message = placeholder(status, page, "Pick 11 players with one C and one VC.");
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [summary_area, table_area] =
        Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(inner);

    let mut lines = summary_lines(estimate);
    if status == RequestStatus::Pending {
        lines.push(Line::from(Span::styled(
            " Updating...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(error) = &page.error {
        lines.push(error_line(error));
    }
    frame.render_widget(Paragraph::new(lines), summary_area);

    let header = Row::new(vec![Cell::from("Player"), Cell::from(""), Cell::from("Pts")])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = estimate
        .individual_preds
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(p.tag.clone().unwrap_or_default()),
                Cell::from(p.points.to_string()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Min(16), Constraint::Length(3), Constraint::Length(5)],
    )
    .header(header);
    frame.render_widget(table, table_area);
}

/// Header lines: total, bonuses, rank range, verdict.
pub fn summary_lines(estimate: &FantasyEstimate) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::raw(" Total: "),
            Span::styled(
                format!("{} pts", estimate.total_points),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!(
            " C bonus: {}  VC bonus: {}",
            estimate.captain_bonus, estimate.vice_captain_bonus
        )),
        Line::from(format!(
            " Expected rank: {} - {}",
            estimate.rank_low, estimate.rank_high
        )),
        Line::from(Span::styled(
            format!(" {}", estimate.verdict()),
            Style::default().fg(Color::Cyan),
        )),
    ]
}

pub fn render_performance(
    frame: &mut Frame,
    area: Rect,
    page: &PageSnapshot,
    status: RequestStatus,
    prediction: Option<&PerformancePrediction>,
) {
    let block = Block::default().borders(Borders::ALL).title("Predicted Performance");

    let Some(prediction) = prediction else {
        let message = placeholder(status, page, "Press p to predict the squad's performance.");
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [table_area, summary_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(inner);

    let header = Row::new(vec![
        Cell::from("Player"),
        Cell::from("Team"),
        Cell::from("Role"),
        Cell::from("Runs"),
        Cell::from("Wkts"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = prediction
        .predictions
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(p.team.clone()),
                Cell::from(p.role.clone()),
                Cell::from(p.predicted_runs.to_string()),
                Cell::from(p.predicted_wickets.to_string()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(5),
            Constraint::Length(5),
        ],
    )
    .header(header);
    frame.render_widget(table, table_area);

    let summary = &prediction.team_summary;
    let mut lines = vec![
        Line::from(format!(
            " Team: {} runs, {} wickets",
            summary.total_runs, summary.total_wickets
        )),
        Line::from(format!(" Best performer: {}", summary.best_performer)),
    ];
    if let Some(error) = &page.error {
        lines.push(error_line(error));
    } else if status == RequestStatus::Pending {
        lines.push(Line::from(Span::styled(
            " Updating...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), summary_area);
}

/// Text shown when there is no result to draw.
pub fn placeholder(status: RequestStatus, page: &PageSnapshot, idle: &str) -> Line<'static> {
    match status {
        RequestStatus::Pending => Line::from(Span::styled(
            " Working...",
            Style::default().fg(Color::DarkGray),
        )),
        RequestStatus::Failed => match &page.error {
            Some(error) => error_line(error),
            None => Line::from(" Request failed"),
        },
        RequestStatus::Idle | RequestStatus::Ready => Line::from(Span::styled(
            format!(" {idle}"),
            Style::default().fg(Color::DarkGray),
        )),
    }
}

/// The panel error in red, followed by the underlying failure when known.
pub fn error_line(error: &PanelError) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" {}", error.message),
        Style::default().fg(Color::Red),
    )];
    if let Some(detail) = &error.detail {
        spans.push(Span::styled(
            format!(" ({detail})"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PlayerPoints, PlayerPrediction, TeamSummary};
    use crate::protocol::{PageId, ResultsSnapshot, SearchSnapshot};

    fn page(error: Option<PanelError>) -> PageSnapshot {
        PageSnapshot {
            id: PageId::Fantasy,
            universe: RequestStatus::Ready,
            universe_size: 0,
            search: SearchSnapshot::default(),
            squad: vec![],
            max_size: 11,
            complete: false,
            results: ResultsSnapshot::Fantasy {
                status: RequestStatus::Idle,
                estimate: None,
            },
            error,
        }
    }

    fn estimate(total: i64) -> FantasyEstimate {
        FantasyEstimate {
            total_points: total,
            captain_bonus: 40,
            vice_captain_bonus: 15,
            rank_low: 120,
            rank_high: 900,
            individual_preds: vec![PlayerPoints {
                name: "Rohit Sharma".into(),
                points: 80,
                tag: Some("C".into()),
            }],
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn summary_lines_include_totals_and_verdict() {
        let lines = summary_lines(&estimate(260));
        assert_eq!(text(&lines[0]), " Total: 260 pts");
        assert_eq!(text(&lines[1]), " C bonus: 40  VC bonus: 15");
        assert_eq!(text(&lines[2]), " Expected rank: 120 - 900");
        assert_eq!(text(&lines[3]), " Great! Top 5-10% likely.");
    }

    #[test]
    fn placeholder_shows_error_on_failure() {
        let page = page(Some(PanelError::estimate_failed()));
        let line = placeholder(RequestStatus::Failed, &page, "idle");
        assert_eq!(text(&line), " Could not estimate fantasy points. Try again.");
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn error_line_appends_detail() {
        let error = PanelError::estimate_failed().with_detail(Some("backend returned status 500"));
        let line = error_line(&error);
        assert_eq!(
            text(&line),
            " Could not estimate fantasy points. Try again. (backend returned status 500)"
        );
        assert_eq!(line.spans[1].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn placeholder_idle_text() {
        let line = placeholder(RequestStatus::Idle, &page(None), "Pick players");
        assert_eq!(text(&line), " Pick players");
    }

    #[test]
    fn render_fantasy_and_performance_do_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let snapshot = page(Some(PanelError::predict_failed()));
        let prediction = PerformancePrediction {
            predictions: vec![PlayerPrediction {
                name: "Jasprit Bumrah".into(),
                team: "MI".into(),
                role: "Bowler".into(),
                predicted_runs: 4,
                predicted_wickets: 2,
            }],
            team_summary: TeamSummary {
                total_runs: 4,
                total_wickets: 2,
                best_performer: "Jasprit Bumrah".into(),
            },
        };
        let est = estimate(180);
        terminal
            .draw(|frame| {
                let [a, b] = Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)])
                    .areas(frame.area());
                render_fantasy(frame, a, &snapshot, RequestStatus::Ready, Some(&est));
                render_performance(frame, b, &snapshot, RequestStatus::Failed, Some(&prediction));
            })
            .unwrap();
    }
}
