// Player clustering panel: the picked player's cluster card above the
// cluster table for the current mode.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::api::{Cluster, ClusterMode, PlayerCluster};
use crate::protocol::PageSnapshot;
use crate::request::RequestStatus;
use crate::tui::widgets::estimate::{error_line, placeholder};

const CARD_HEIGHT: u16 = 6;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    page: &PageSnapshot,
    mode: ClusterMode,
    status: RequestStatus,
    player: Option<&PlayerCluster>,
    clusters: &[Cluster],
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Player Clusters ({})", mode.label()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [card_area, table_area] =
        Layout::vertical([Constraint::Length(CARD_HEIGHT), Constraint::Min(0)]).areas(inner);

    let mut lines = Vec::new();
    match player {
        Some(player) => {
            if let Some(error) = &page.error {
                lines.push(error_line(error));
            } else if status == RequestStatus::Pending {
                lines.push(Line::from(Span::styled(
                    " Loading...",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.extend(card_lines(player, mode));
        }
        None if page.universe == RequestStatus::Ready => {
            lines.push(placeholder(status, page, "Search for a player to see their cluster."));
        }
        None => {}
    }
    frame.render_widget(Paragraph::new(lines), card_area);

    if clusters.is_empty() {
        let message = match (page.universe, &page.error) {
            (RequestStatus::Failed, Some(error)) => error_line(error),
            (RequestStatus::Ready, _) => Line::from(" No clusters."),
            _ => Line::from(Span::styled(
                " Loading clusters...",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(message), table_area);
        return;
    }

    let mut header = vec![Cell::from("Cluster"), Cell::from("Players")];
    header.extend(average_labels(mode).into_iter().map(Cell::from));
    let rows: Vec<Row> = clusters
        .iter()
        .map(|c| {
            let mut cells = vec![
                Cell::from(c.cluster_label.clone()),
                Cell::from(c.count.to_string()),
            ];
            cells.extend(averages(c, mode).into_iter().map(Cell::from));
            Row::new(cells)
        })
        .collect();
    let widths = [
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
    ];
    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)));
    frame.render_widget(table, table_area);
}

pub fn card_lines(player: &PlayerCluster, mode: ClusterMode) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", player.player),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(" Cluster: "),
            Span::styled(
                player.cluster_label.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    match mode {
        ClusterMode::Batters => {
            lines.push(Line::from(format!(
                " Strike rate: {}",
                decimal(player.strike_rate)
            )));
            lines.push(Line::from(format!(
                " 4s: {} | 6s: {}",
                count(player.fours),
                count(player.sixes)
            )));
        }
        ClusterMode::Bowlers => {
            lines.push(Line::from(format!(" Economy: {}", decimal(player.economy))));
            lines.push(Line::from(format!(" Wickets: {}", count(player.wickets))));
        }
    }
    lines
}

fn average_labels(mode: ClusterMode) -> Vec<&'static str> {
    match mode {
        ClusterMode::Batters => vec!["Avg SR", "Avg 4s", "Avg 6s"],
        ClusterMode::Bowlers => vec!["Avg Econ", "Avg Wkts"],
    }
}

fn averages(cluster: &Cluster, mode: ClusterMode) -> Vec<String> {
    match mode {
        ClusterMode::Batters => vec![
            decimal(cluster.avg_strike_rate),
            decimal(cluster.avg_fours),
            decimal(cluster.avg_sixes),
        ],
        ClusterMode::Bowlers => vec![decimal(cluster.avg_economy), decimal(cluster.avg_wickets)],
    }
}

fn decimal(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{v:.2}"))
}

fn count(value: Option<i64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| v.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PageId, PanelError, ResultsSnapshot, SearchSnapshot};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn bumrah() -> PlayerCluster {
        PlayerCluster {
            player: "JJ Bumrah".into(),
            cluster: 1,
            cluster_label: "Strike Bowlers".into(),
            strike_rate: None,
            fours: None,
            sixes: None,
            economy: Some(7.123),
            wickets: Some(145),
        }
    }

    fn page(universe: RequestStatus, error: Option<PanelError>) -> PageSnapshot {
        PageSnapshot {
            id: PageId::Clustering,
            universe,
            universe_size: 0,
            search: SearchSnapshot::default(),
            squad: vec![],
            max_size: 0,
            complete: false,
            results: ResultsSnapshot::Clustering {
                mode: ClusterMode::Bowlers,
                status: RequestStatus::Idle,
                player: None,
                clusters: vec![],
            },
            error,
        }
    }

    #[test]
    fn bowler_card_shows_economy_and_wickets() {
        let lines = card_lines(&bumrah(), ClusterMode::Bowlers);
        assert_eq!(text(&lines[0]), " JJ Bumrah");
        assert_eq!(text(&lines[1]), " Cluster: Strike Bowlers");
        assert_eq!(text(&lines[2]), " Economy: 7.12");
        assert_eq!(text(&lines[3]), " Wickets: 145");
    }

    #[test]
    fn missing_batting_fields_show_dashes() {
        let lines = card_lines(&bumrah(), ClusterMode::Batters);
        assert_eq!(text(&lines[2]), " Strike rate: --");
        assert_eq!(text(&lines[3]), " 4s: -- | 6s: --");
    }

    #[test]
    fn table_columns_follow_mode() {
        assert_eq!(average_labels(ClusterMode::Batters).len(), 3);
        let cluster = Cluster {
            cluster_label: "Spinners".into(),
            members: vec!["Rashid Khan".into()],
            count: 1,
            avg_strike_rate: None,
            avg_fours: None,
            avg_sixes: None,
            avg_economy: Some(6.5),
            avg_wickets: Some(20.0),
        };
        assert_eq!(averages(&cluster, ClusterMode::Bowlers), vec!["6.50", "20.00"]);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(70, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let failed = page(RequestStatus::Failed, Some(PanelError::clusters_unavailable()));
        let ready = page(RequestStatus::Ready, None);
        let clusters = vec![Cluster {
            cluster_label: "Strike Bowlers".into(),
            members: vec!["JJ Bumrah".into()],
            count: 1,
            avg_strike_rate: None,
            avg_fours: None,
            avg_sixes: None,
            avg_economy: Some(7.4),
            avg_wickets: Some(18.5),
        }];
        let player = bumrah();
        terminal
            .draw(|frame| {
                let [a, b] = Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)])
                    .areas(frame.area());
                render(frame, a, &failed, ClusterMode::Bowlers, RequestStatus::Idle, None, &[]);
                render(
                    frame,
                    b,
                    &ready,
                    ClusterMode::Bowlers,
                    RequestStatus::Ready,
                    Some(&player),
                    &clusters,
                );
            })
            .unwrap();
    }
}
