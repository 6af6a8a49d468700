// Search widget: the query input and the suggestion list beneath it.
//
// Suggestions show the matched prefix in bold. The list scrolls to keep the
// cursor row visible; `row_at` maps a pointer position back to a row using
// the same offset so clicks pick what is on screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::protocol::{PageSnapshot, SearchSnapshot, SuggestionRow};
use crate::request::RequestStatus;
use crate::tui::ViewState;

pub fn render_input(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(page) = state.page() else {
        frame.render_widget(Block::default().borders(Borders::ALL).title("Search"), area);
        return;
    };

    let border = if state.search_mode {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = if page.search.query.is_empty() && !state.search_mode {
        Line::from(Span::styled(
            " Press / to search players",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::raw(format!(" {}", page.search.query))];
        if state.search_mode {
            spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
        }
        Line::from(spans)
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title("Search"),
    );
    frame.render_widget(paragraph, area);
}

pub fn render_suggestions(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut block = Block::default().borders(Borders::ALL).title("Suggestions");
    let Some(page) = state.page() else {
        frame.render_widget(block, area);
        return;
    };
    if let Some(hint) = &page.search.hint {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {hint} "),
            Style::default().fg(Color::Yellow),
        )));
    }

    if let Some(message) = status_message(page) {
        let paragraph = Paragraph::new(message.0)
            .style(Style::default().fg(message.1))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = visible_rows(area);
    let offset = list_offset(page.search.cursor, visible);
    let items: Vec<ListItem> = shown_rows(&page.search)
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, row)| ListItem::new(highlight_line(row, i == page.search.cursor)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Placeholder text shown instead of the list while loading or after a
/// failed load.
fn status_message(page: &PageSnapshot) -> Option<(String, Color)> {
    match page.universe {
        RequestStatus::Idle | RequestStatus::Pending => {
            Some((" Loading players...".to_string(), Color::DarkGray))
        }
        RequestStatus::Failed => {
            let message = page
                .error
                .as_ref()
                .map_or("Could not load player names", |e| e.message.as_str());
            Some((format!(" {message}"), Color::Red))
        }
        RequestStatus::Ready => None,
    }
}

/// Rows to draw. A closed selector draws an empty list.
pub fn shown_rows(search: &SearchSnapshot) -> &[SuggestionRow] {
    if search.open {
        &search.rows
    } else {
        &[]
    }
}

/// One suggestion row: bold matched prefix, plain remainder.
pub fn highlight_line(row: &SuggestionRow, selected: bool) -> Line<'static> {
    let split = row.matched_prefix_len.min(row.name.len());
    let (matched, rest) = row
        .name
        .split_at_checked(split)
        .unwrap_or(("", row.name.as_str()));

    let base = if selected {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    };
    let marker = if selected { "> " } else { "  " };

    let mut spans = vec![Span::styled(marker, base)];
    if !matched.is_empty() {
        spans.push(Span::styled(
            matched.to_string(),
            base.add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(rest.to_string(), base));
    Line::from(spans)
}

/// Rows that fit inside the bordered list.
pub fn visible_rows(area: Rect) -> usize {
    (area.height as usize).saturating_sub(2)
}

/// First row to draw so that `cursor` stays on screen.
pub fn list_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    cursor.saturating_sub(visible - 1)
}

/// The suggestion index drawn at terminal position (`column`, `row`), if any.
pub fn row_at(area: Rect, column: u16, row: u16, cursor: usize, total: usize) -> Option<usize> {
    let inner_top = area.y.saturating_add(1);
    let inner_bottom = area.y.saturating_add(area.height).saturating_sub(1);
    let inner_left = area.x.saturating_add(1);
    let inner_right = area.x.saturating_add(area.width).saturating_sub(1);
    if row < inner_top || row >= inner_bottom || column < inner_left || column >= inner_right {
        return None;
    }
    let offset = list_offset(cursor, visible_rows(area));
    let index = offset + (row - inner_top) as usize;
    (index < total).then_some(index)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, matched: usize) -> SuggestionRow {
        SuggestionRow {
            name: name.to_string(),
            matched_prefix_len: matched,
        }
    }

    #[test]
    fn highlight_line_bolds_prefix_only() {
        let line = highlight_line(&row("Virat Kohli", 3), false);
        assert_eq!(line.spans[1].content, "Vir");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[2].content, "at Kohli");
        assert!(!line.spans[2].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn highlight_line_without_prefix_has_no_bold_span() {
        let line = highlight_line(&row("Virat Kohli", 0), false);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[1].content, "Virat Kohli");
    }

    #[test]
    fn highlight_line_tolerates_bad_offsets() {
        let line = highlight_line(&row("Jos Buttler", 99), true);
        assert_eq!(line.spans[1].content, "Jos Buttler");
        // Inside a multi-byte character.
        let line = highlight_line(&row("Émile", 1), false);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "  Émile");
    }

    #[test]
    fn list_offset_keeps_cursor_visible() {
        assert_eq!(list_offset(0, 5), 0);
        assert_eq!(list_offset(4, 5), 0);
        assert_eq!(list_offset(5, 5), 1);
        assert_eq!(list_offset(12, 5), 8);
        assert_eq!(list_offset(3, 0), 0);
    }

    #[test]
    fn row_at_maps_clicks_inside_border() {
        let area = Rect::new(0, 4, 30, 7); // 5 visible rows at y 5..10
        assert_eq!(row_at(area, 3, 5, 0, 3), Some(0));
        assert_eq!(row_at(area, 3, 7, 0, 3), Some(2));
        // Below the last row.
        assert_eq!(row_at(area, 3, 8, 0, 3), None);
        // On the border.
        assert_eq!(row_at(area, 3, 4, 0, 3), None);
        assert_eq!(row_at(area, 0, 5, 0, 3), None);
    }

    #[test]
    fn row_at_accounts_for_scroll() {
        let area = Rect::new(0, 0, 30, 7); // 5 visible rows
        // Cursor at 7 scrolls the list by 3.
        assert_eq!(row_at(area, 2, 1, 7, 10), Some(3));
    }

    #[test]
    fn closed_search_shows_no_rows() {
        let mut search = SearchSnapshot {
            query: "ro".to_string(),
            open: true,
            rows: vec![row("Rohit Sharma", 2)],
            cursor: 0,
            hint: None,
        };
        assert_eq!(shown_rows(&search).len(), 1);
        search.open = false;
        assert!(shown_rows(&search).is_empty());
    }

    #[test]
    fn render_does_not_panic_without_snapshot() {
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| {
                render_input(frame, Rect::new(0, 0, 40, 3), &state);
                render_suggestions(frame, Rect::new(0, 3, 40, 7), &state);
            })
            .unwrap();
    }
}
