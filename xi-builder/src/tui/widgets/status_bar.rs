// Status bar widget: load indicator, squad counter, tab indicator.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::PageId;
use crate::request::RequestStatus;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [load indicator] [squad counter] | [tab bar]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let status = state.page().map_or(RequestStatus::Idle, |p| p.universe);
    let (dot, dot_color) = load_indicator(status);
    spans.push(Span::styled(format!(" {dot} "), Style::default().fg(dot_color)));

    if let Some(counter) = state.page().and_then(|page| {
        page.id.has_squad().then(|| squad_counter(page.squad.len(), page.max_size, page.complete))
    }) {
        spans.push(counter);
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    }

    spans.extend(tab_spans(state.active_tab));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Dot and color for the candidate list load status.
pub fn load_indicator(status: RequestStatus) -> (&'static str, Color) {
    match status {
        RequestStatus::Ready => ("●", Color::Green),
        RequestStatus::Idle | RequestStatus::Pending => ("●", Color::Yellow),
        RequestStatus::Failed => ("●", Color::Red),
    }
}

/// "n/11 selected", green once the squad is complete.
pub fn squad_counter(selected: usize, max: usize, complete: bool) -> Span<'static> {
    let color = if complete { Color::Green } else { Color::White };
    Span::styled(format!("{selected}/{max} selected"), Style::default().fg(color))
}

/// Tab indicator spans with the active tab highlighted.
/// E.g. "[1:Fantasy XI] [2:Performance] [3:Batter Stats] [4:Clusters]"
pub fn tab_spans(active: PageId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for page in PageId::ALL {
        let style = if page == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}:{}]", page.index() + 1, page.title()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_indicator_colors() {
        assert_eq!(load_indicator(RequestStatus::Ready).1, Color::Green);
        assert_eq!(load_indicator(RequestStatus::Pending).1, Color::Yellow);
        assert_eq!(load_indicator(RequestStatus::Failed).1, Color::Red);
    }

    #[test]
    fn squad_counter_text() {
        let span = squad_counter(7, 11, false);
        assert_eq!(span.content, "7/11 selected");
        assert_eq!(span.style.fg, Some(Color::White));
        assert_eq!(squad_counter(11, 11, true).style.fg, Some(Color::Green));
    }

    #[test]
    fn tab_spans_highlight_active() {
        let spans = tab_spans(PageId::Performance);
        // 0=[1:Fantasy XI], 1=" ", 2=[2:Performance]
        assert!(spans[2].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn tab_spans_contain_descriptive_labels() {
        let spans = tab_spans(PageId::Fantasy);
        let labels: Vec<&str> = spans
            .iter()
            .step_by(2)
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(
            labels,
            vec![
                "[1:Fantasy XI]",
                "[2:Performance]",
                "[3:Batter Stats]",
                "[4:Clusters]"
            ]
        );
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
