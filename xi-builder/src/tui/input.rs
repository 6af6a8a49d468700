// Keyboard and mouse input handling.
//
// Translates crossterm events into UserCommand messages for the app
// orchestrator, or into local ViewState mutations (squad cursor, modes).

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use super::layout::AppLayout;
use super::widgets::search::{list_offset, row_at};
use super::ViewState;
use crate::protocol::{PageId, ResultsSnapshot, SearchKey, UserCommand};
use crate::squad::Role;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when it was handled locally or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows emits Press and Release for every keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.search_mode {
        return handle_search_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => switch_tab(view_state, PageId::Fantasy),
        KeyCode::Char('2') => switch_tab(view_state, PageId::Performance),
        KeyCode::Char('3') => switch_tab(view_state, PageId::Stats),
        KeyCode::Char('4') => switch_tab(view_state, PageId::Clustering),

        KeyCode::Char('/') | KeyCode::Char('i') => {
            view_state.search_mode = true;
            Some(UserCommand::Search(SearchKey::Focus))
        }

        // Squad cursor
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.squad_cursor = view_state.squad_cursor.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.squad_len().saturating_sub(1);
            view_state.squad_cursor = (view_state.squad_cursor + 1).min(last);
            None
        }

        KeyCode::Char('c') => toggle_role(view_state, Role::Captain),
        KeyCode::Char('v') => toggle_role(view_state, Role::ViceCaptain),

        KeyCode::Char('d') | KeyCode::Delete => {
            if view_state.squad_len() == 0 {
                return None;
            }
            Some(UserCommand::RemoveMember(view_state.squad_cursor))
        }

        KeyCode::Char('p') => {
            (view_state.active_tab == PageId::Performance).then_some(UserCommand::Predict)
        }

        KeyCode::Char('m') => toggle_cluster_mode(view_state),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// In quit confirmation mode `y`/`q` confirm, `n`/Esc cancel, everything
/// else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Every printable key goes to the query while the search box has focus.
fn handle_search_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let key = match key_event.code {
        KeyCode::Esc | KeyCode::Tab => {
            view_state.search_mode = false;
            SearchKey::Blur
        }
        KeyCode::Enter => SearchKey::Enter,
        KeyCode::Up => SearchKey::Up,
        KeyCode::Down => SearchKey::Down,
        KeyCode::Backspace => SearchKey::Backspace,
        KeyCode::Char(c) => SearchKey::Insert(c),
        _ => return None,
    };
    Some(UserCommand::Search(key))
}

/// The shown tab only changes once the app confirms it with a snapshot.
fn switch_tab(view_state: &ViewState, page: PageId) -> Option<UserCommand> {
    (view_state.active_tab != page).then_some(UserCommand::SwitchTab(page))
}

fn toggle_role(view_state: &ViewState, role: Role) -> Option<UserCommand> {
    if view_state.active_tab != PageId::Fantasy || view_state.squad_len() == 0 {
        return None;
    }
    Some(UserCommand::ToggleRole {
        index: view_state.squad_cursor,
        role,
    })
}

/// Flip between batter and bowler clusters on the clustering page.
fn toggle_cluster_mode(view_state: &ViewState) -> Option<UserCommand> {
    match view_state.page()?.results {
        ResultsSnapshot::Clustering { mode, .. } => {
            Some(UserCommand::SetClusterMode(mode.toggled()))
        }
        _ => None,
    }
}

/// Handle a mouse event against the layout that was last drawn.
///
/// A left click on a suggestion picks it, a click on the input focuses it,
/// and a click anywhere else while searching blurs the search box. The
/// scroll wheel moves the suggestion highlight.
pub fn handle_mouse(
    mouse_event: MouseEvent,
    view_state: &mut ViewState,
    layout: &AppLayout,
) -> Option<UserCommand> {
    if view_state.confirm_quit {
        return None;
    }
    let position = Position::new(mouse_event.column, mouse_event.row);

    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if layout.search_input.contains(position) {
                view_state.search_mode = true;
                return Some(UserCommand::Search(SearchKey::Focus));
            }

            if layout.suggestions.contains(position) {
                if let Some(name) = suggestion_at(view_state, layout.suggestions, position) {
                    view_state.search_mode = true;
                    return Some(UserCommand::Search(SearchKey::Pick(name)));
                }
            }

            if layout.squad.contains(position) {
                select_squad_row(view_state, layout.squad, position);
            }

            if view_state.search_mode {
                view_state.search_mode = false;
                return Some(UserCommand::Search(SearchKey::Blur));
            }
            None
        }
        MouseEventKind::ScrollDown if view_state.search_mode => {
            Some(UserCommand::Search(SearchKey::Down))
        }
        MouseEventKind::ScrollUp if view_state.search_mode => {
            Some(UserCommand::Search(SearchKey::Up))
        }
        _ => None,
    }
}

/// Name of the open suggestion row under `position`.
fn suggestion_at(view_state: &ViewState, area: Rect, position: Position) -> Option<String> {
    let search = &view_state.page()?.search;
    if !search.open {
        return None;
    }
    let index = row_at(area, position.x, position.y, search.cursor, search.rows.len())?;
    search.rows.get(index).map(|row| row.name.clone())
}

fn select_squad_row(view_state: &mut ViewState, area: Rect, position: Position) {
    let total = view_state.squad_len();
    let Some(index) = row_at(area, position.x, position.y, 0, usize::MAX) else {
        return;
    };
    let visible = (area.height as usize).saturating_sub(2);
    let offset = list_offset(view_state.squad_cursor.min(total.saturating_sub(1)), visible);
    let index = offset + index;
    if index < total {
        view_state.squad_cursor = index;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClusterMode;
    use crate::protocol::{AppSnapshot, MemberRow, PageSnapshot, SearchSnapshot, SuggestionRow};
    use crate::request::RequestStatus;
    use crate::tui::layout::build_layout;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn member(name: &str) -> MemberRow {
        MemberRow {
            name: name.to_string(),
            tag: "",
            role: String::new(),
            team: String::new(),
            profile_pending: false,
        }
    }

    /// A view of the fantasy page with `squad` selected and `rows` listed.
    fn state_with(squad: &[&str], rows: &[&str]) -> ViewState {
        let page = PageSnapshot {
            id: PageId::Fantasy,
            universe: RequestStatus::Ready,
            universe_size: 20,
            search: SearchSnapshot {
                query: "a".into(),
                open: !rows.is_empty(),
                rows: rows
                    .iter()
                    .map(|n| SuggestionRow {
                        name: n.to_string(),
                        matched_prefix_len: 0,
                    })
                    .collect(),
                cursor: 0,
                hint: None,
            },
            squad: squad.iter().map(|n| member(n)).collect(),
            max_size: 11,
            complete: false,
            results: ResultsSnapshot::Fantasy {
                status: RequestStatus::Idle,
                estimate: None,
            },
            error: None,
        };
        let mut state = ViewState::default();
        state.apply_snapshot(AppSnapshot {
            active: PageId::Fantasy,
            page,
        });
        state
    }

    // -- Tabs --

    #[test]
    fn number_keys_switch_tabs() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('2')), &mut state),
            Some(UserCommand::SwitchTab(PageId::Performance))
        );
        assert_eq!(state.active_tab, PageId::Fantasy);
        assert_eq!(
            handle_key(key(KeyCode::Char('3')), &mut state),
            Some(UserCommand::SwitchTab(PageId::Stats))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('4')), &mut state),
            Some(UserCommand::SwitchTab(PageId::Clustering))
        );
    }

    #[test]
    fn switching_to_active_tab_is_noop() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('1')), &mut state), None);
    }

    // -- Search mode --

    #[test]
    fn slash_enters_search_mode() {
        let mut state = ViewState::default();
        let cmd = handle_key(key(KeyCode::Char('/')), &mut state);
        assert_eq!(cmd, Some(UserCommand::Search(SearchKey::Focus)));
        assert!(state.search_mode);
    }

    #[test]
    fn search_mode_forwards_typing() {
        let mut state = ViewState::default();
        state.search_mode = true;
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), &mut state),
            Some(UserCommand::Search(SearchKey::Insert('q')))
        );
        assert!(!state.confirm_quit);
        assert_eq!(
            handle_key(key(KeyCode::Backspace), &mut state),
            Some(UserCommand::Search(SearchKey::Backspace))
        );
        assert_eq!(
            handle_key(key(KeyCode::Down), &mut state),
            Some(UserCommand::Search(SearchKey::Down))
        );
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::Search(SearchKey::Enter))
        );
        assert!(state.search_mode);
    }

    #[test]
    fn esc_blurs_and_leaves_search_mode() {
        let mut state = ViewState::default();
        state.search_mode = true;
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::Search(SearchKey::Blur))
        );
        assert!(!state.search_mode);
    }

    #[test]
    fn digits_type_into_query_while_searching() {
        let mut state = ViewState::default();
        state.search_mode = true;
        assert_eq!(
            handle_key(key(KeyCode::Char('2')), &mut state),
            Some(UserCommand::Search(SearchKey::Insert('2')))
        );
        assert_eq!(state.active_tab, PageId::Fantasy);
    }

    // -- Squad --

    #[test]
    fn squad_cursor_moves_within_bounds() {
        let mut state = state_with(&["A", "B", "C"], &[]);
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.squad_cursor, 2);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.squad_cursor, 1);
        handle_key(key(KeyCode::Char('k')), &mut state);
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.squad_cursor, 0);
    }

    #[test]
    fn c_and_v_toggle_roles_at_cursor() {
        let mut state = state_with(&["A", "B"], &[]);
        state.squad_cursor = 1;
        assert_eq!(
            handle_key(key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::ToggleRole {
                index: 1,
                role: Role::Captain
            })
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('v')), &mut state),
            Some(UserCommand::ToggleRole {
                index: 1,
                role: Role::ViceCaptain
            })
        );
    }

    #[test]
    fn role_keys_need_a_squad() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('c')), &mut state), None);
        assert_eq!(handle_key(key(KeyCode::Char('d')), &mut state), None);
    }

    #[test]
    fn d_removes_member_at_cursor() {
        let mut state = state_with(&["A", "B"], &[]);
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), &mut state),
            Some(UserCommand::RemoveMember(0))
        );
    }

    #[test]
    fn p_predicts_only_on_performance_page() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('p')), &mut state), None);
        state.active_tab = PageId::Performance;
        assert_eq!(
            handle_key(key(KeyCode::Char('p')), &mut state),
            Some(UserCommand::Predict)
        );
    }

    #[test]
    fn m_toggles_cluster_mode_on_clustering_page() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('m')), &mut state), None);

        let mut page = state_with(&[], &[]).page().cloned().unwrap();
        page.id = PageId::Clustering;
        page.squad.clear();
        page.results = ResultsSnapshot::Clustering {
            mode: ClusterMode::Batters,
            status: RequestStatus::Idle,
            player: None,
            clusters: vec![],
        };
        state.apply_snapshot(AppSnapshot {
            active: PageId::Clustering,
            page,
        });
        assert_eq!(
            handle_key(key(KeyCode::Char('m')), &mut state),
            Some(UserCommand::SetClusterMode(ClusterMode::Bowlers))
        );
    }

    // -- Quit --

    #[test]
    fn q_enters_confirm_mode() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), None);
        assert!(state.confirm_quit);
    }

    #[test]
    fn confirm_quit_y_sends_quit() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn confirm_quit_n_cancels() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert_eq!(handle_key(key(KeyCode::Char('n')), &mut state), None);
        assert!(!state.confirm_quit);
    }

    #[test]
    fn confirm_quit_blocks_other_keys() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert_eq!(handle_key(key(KeyCode::Char('2')), &mut state), None);
        assert_eq!(state.active_tab, PageId::Fantasy);
        assert!(state.confirm_quit);
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let mut state = ViewState::default();
        state.search_mode = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key(event, &mut state), None);
        assert!(!state.confirm_quit);
    }

    // -- Mouse --

    #[test]
    fn click_on_suggestion_picks_it() {
        let mut state = state_with(&[], &["Rohit Sharma", "Rashid Khan"]);
        state.search_mode = true;
        let layout = build_layout(Rect::new(0, 0, 100, 30), true);
        let second_row = layout.suggestions.y + 2;
        let cmd = handle_mouse(click(layout.suggestions.x + 3, second_row), &mut state, &layout);
        assert_eq!(
            cmd,
            Some(UserCommand::Search(SearchKey::Pick("Rashid Khan".into())))
        );
        assert!(state.search_mode);
    }

    #[test]
    fn click_below_last_suggestion_blurs() {
        let mut state = state_with(&[], &["Rohit Sharma"]);
        state.search_mode = true;
        let layout = build_layout(Rect::new(0, 0, 100, 30), true);
        let cmd = handle_mouse(
            click(layout.suggestions.x + 3, layout.suggestions.y + 5),
            &mut state,
            &layout,
        );
        assert_eq!(cmd, Some(UserCommand::Search(SearchKey::Blur)));
        assert!(!state.search_mode);
    }

    #[test]
    fn click_on_input_focuses() {
        let mut state = ViewState::default();
        let layout = build_layout(Rect::new(0, 0, 100, 30), true);
        let cmd = handle_mouse(
            click(layout.search_input.x + 2, layout.search_input.y + 1),
            &mut state,
            &layout,
        );
        assert_eq!(cmd, Some(UserCommand::Search(SearchKey::Focus)));
        assert!(state.search_mode);
    }

    #[test]
    fn click_on_squad_row_moves_cursor() {
        let mut state = state_with(&["A", "B", "C"], &[]);
        let layout = build_layout(Rect::new(0, 0, 100, 30), true);
        let cmd = handle_mouse(
            click(layout.squad.x + 4, layout.squad.y + 3),
            &mut state,
            &layout,
        );
        assert_eq!(cmd, None);
        assert_eq!(state.squad_cursor, 2);
    }

    #[test]
    fn click_outside_without_focus_does_nothing() {
        let mut state = ViewState::default();
        let layout = build_layout(Rect::new(0, 0, 100, 30), true);
        assert_eq!(
            handle_mouse(click(layout.results.x + 2, layout.results.y + 2), &mut state, &layout),
            None
        );
    }
}
