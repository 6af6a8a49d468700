// Squad widget: the chosen players with their leadership tags.
//
// "1. Rohit Sharma [C]" on the fantasy page,
// "1. Rohit Sharma  Batsman, MI" on the performance page.
// The row under the squad cursor is highlighted; j/k move it.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use crate::protocol::{MemberRow, PageId};
use crate::tui::widgets::search::list_offset;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(page) = state.page() else {
        return;
    };
    if area.height == 0 {
        return;
    }

    let title = squad_title(page.squad.len(), page.max_size, page.complete);
    let block = Block::default().borders(Borders::ALL).title(title);

    if page.squad.is_empty() {
        let paragraph = Paragraph::new("  No players selected.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = page.squad.len();
    let cursor = state.squad_cursor.min(total - 1);
    let offset = list_offset(cursor, visible_rows);
    let show_profile = page.id == PageId::Performance;

    let items: Vec<ListItem> = page
        .squad
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(i, row)| {
            let selected = i == cursor && !state.search_mode;
            ListItem::new(member_line(i, row, show_profile, selected))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// "Squad (7/11)", with a check mark once complete.
pub fn squad_title(selected: usize, max: usize, complete: bool) -> String {
    if complete {
        format!("Squad ({selected}/{max}) ✓")
    } else {
        format!("Squad ({selected}/{max})")
    }
}

fn member_line(index: usize, row: &MemberRow, show_profile: bool, selected: bool) -> Line<'static> {
    let base = if selected {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![Span::styled(format!(" {}. {}", index + 1, row.name), base)];
    if !row.tag.is_empty() {
        spans.push(Span::styled(
            format!(" [{}]", row.tag),
            base.fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if show_profile {
        spans.push(Span::styled(
            format!("  {}", profile_text(row)),
            base.fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Role and team, or a placeholder while the lookup is outstanding.
pub fn profile_text(row: &MemberRow) -> String {
    if row.profile_pending {
        return "loading...".to_string();
    }
    match (row.role.is_empty(), row.team.is_empty()) {
        (true, true) => "unknown".to_string(),
        (false, true) => row.role.clone(),
        (true, false) => row.team.clone(),
        (false, false) => format!("{}, {}", row.role, row.team),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
