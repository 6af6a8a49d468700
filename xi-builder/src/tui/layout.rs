// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row): tabs, squad counter           |
// +----------------------+---------------------------+
// | Search input (3)      | Squad (50%)               |
// +----------------------+---------------------------+
// | Suggestions (fill)    | Results (50%)             |
// +----------------------+---------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// Pages without a squad give the whole right column to the results panel.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub search_input: Rect,
    /// Suggestion list under the input, including its border.
    pub suggestions: Rect,
    /// Zero-sized on pages without a squad.
    pub squad: Rect,
    pub results: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect, with_squad: bool) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // body
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let body = vertical[1];
    let help_bar = vertical[2];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body);

    let search_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[0]);

    let (squad, results) = if with_squad {
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);
        (right[0], right[1])
    } else {
        (Rect::new(columns[1].x, columns[1].y, 0, 0), columns[1])
    };

    AppLayout {
        status_bar,
        search_input: search_column[0],
        suggestions: search_column[1],
        squad,
        results,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_fills_standard_terminal() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = build_layout(area, true);

        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.search_input.height, 3);
        assert_eq!(layout.status_bar.y, 0);
        assert_eq!(layout.help_bar.y, 39);

        // Suggestions sit directly below the input.
        assert_eq!(layout.suggestions.y, layout.search_input.y + 3);
        assert_eq!(
            layout.suggestions.height + layout.search_input.height,
            38
        );

        // Right column splits between squad and results.
        assert_eq!(layout.squad.x, layout.results.x);
        assert_eq!(layout.squad.height + layout.results.height, 38);
        assert!(layout.search_input.width < layout.squad.width);
    }

    #[test]
    fn layout_without_squad_gives_results_full_column() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = build_layout(area, false);
        assert_eq!(layout.squad.height, 0);
        assert_eq!(layout.results.height, 28);
    }

    #[test]
    fn layout_small_terminal_does_not_panic() {
        let area = Rect::new(0, 0, 30, 10);
        let layout = build_layout(area, true);
        assert!(layout.status_bar.width > 0);
    }
}
