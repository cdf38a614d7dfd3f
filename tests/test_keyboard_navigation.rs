use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dashboard_search::core::{KeyboardNavigator, NavigationKey, NavigationOutcome, NavigatorState};
use dashboard_search::data::{Category, ResultBucket, ResultItem};
use dashboard_search::services::SearchResponse;
use dashboard_search::widgets::{DashboardSearch, SearchAction};
use std::time::{Duration, Instant};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn key_with_mod(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

/// A search box showing `n` patients for "pat"
fn browsing(n: usize) -> DashboardSearch {
    let t0 = Instant::now();
    let mut search = DashboardSearch::default();
    search.set_query_at("pat", t0);
    let request = search.tick(t0 + Duration::from_millis(300)).unwrap();

    let items = (0..n)
        .map(|i| ResultItem::new(format!("p{}", i), format!("Patient {}", i), "", Category::Patient))
        .collect();
    search.apply_response(SearchResponse::success(
        &request,
        vec![ResultBucket::new(Category::Patient, items)],
    ));
    search
}

#[test]
fn test_arrow_down_cycles_through_list() {
    let n = 4;
    let mut search = browsing(n);
    assert_eq!(search.cursor_index(), -1);

    let visited: Vec<usize> = (0..2 * n)
        .map(|_| match search.handle_key(key(KeyCode::Down)) {
            SearchAction::Navigated(index) => index,
            other => panic!("expected navigation, got {:?}", other),
        })
        .collect();
    assert_eq!(visited, vec![0, 1, 2, 3, 0, 1, 2, 3]);
}

#[test]
fn test_arrow_up_from_idle_lands_on_last() {
    let mut search = browsing(3);
    assert_eq!(search.handle_key(key(KeyCode::Up)), SearchAction::Navigated(2));
    assert_eq!(search.handle_key(key(KeyCode::Up)), SearchAction::Navigated(1));
    assert_eq!(search.handle_key(key(KeyCode::Up)), SearchAction::Navigated(0));
    assert_eq!(search.handle_key(key(KeyCode::Up)), SearchAction::Navigated(2));
}

#[test]
fn test_vim_bindings_navigate() {
    let mut search = browsing(3);
    let ctrl_n = key_with_mod(KeyCode::Char('n'), KeyModifiers::CONTROL);
    let ctrl_p = key_with_mod(KeyCode::Char('p'), KeyModifiers::CONTROL);

    assert_eq!(search.handle_key(ctrl_n), SearchAction::Navigated(0));
    assert_eq!(search.handle_key(ctrl_p), SearchAction::Navigated(2));
    assert_eq!(search.query(), "pat", "bindings must not reach the text field");
}

#[test]
fn test_escape_closes_and_preserves_text() {
    let mut search = browsing(3);
    search.handle_key(key(KeyCode::Down));
    search.handle_key(key(KeyCode::Down));

    assert_eq!(search.handle_key(key(KeyCode::Esc)), SearchAction::Closed);
    assert_eq!(search.navigator_state(), NavigatorState::Closed);
    assert_eq!(search.cursor_index(), -1);
    assert_eq!(search.query(), "pat");
    assert!(!search.is_visible());
}

#[test]
fn test_enter_without_cursor_is_noop() {
    let mut search = browsing(2);
    assert_eq!(search.handle_key(key(KeyCode::Enter)), SearchAction::None);
    assert!(search.is_visible());
    assert_eq!(search.dispatched(), 0);
}

#[test]
fn test_typing_resets_cursor() {
    let mut search = browsing(3);
    search.handle_key(key(KeyCode::Down));
    search.handle_key(key(KeyCode::Down));
    assert_eq!(search.cursor(), Some(1));

    assert_eq!(search.handle_key(key(KeyCode::Char('r'))), SearchAction::Edited);
    assert_eq!(search.cursor(), None);
    assert_eq!(search.query(), "patr");
}

#[test]
fn test_new_results_reset_cursor() {
    let t0 = Instant::now();
    let mut search = browsing(3);
    search.handle_key(key(KeyCode::Down));

    search.set_query_at("patr", t0);
    let request = search.tick(t0 + Duration::from_millis(300)).unwrap();
    search.apply_response(SearchResponse::success(
        &request,
        vec![ResultBucket::new(
            Category::Patient,
            vec![ResultItem::new("p9", "Patrick Dsouza", "", Category::Patient)],
        )],
    ));

    assert_eq!(search.cursor_index(), -1);
    assert_eq!(search.navigator_state(), NavigatorState::Browsing);
}

#[test]
fn test_navigator_ignores_arrows_on_empty_list() {
    let mut nav = KeyboardNavigator::new();
    nav.replace_list(0, true);
    assert_eq!(nav.state(), NavigatorState::Idle);
    assert_eq!(nav.handle(NavigationKey::Down), NavigationOutcome::Ignored);
    assert_eq!(nav.handle(NavigationKey::Up), NavigationOutcome::Ignored);
    assert_eq!(nav.cursor_index(), -1);
}

#[test]
fn test_cursor_stays_in_bounds_after_shrink() {
    let mut nav = KeyboardNavigator::new();
    nav.replace_list(5, true);
    for _ in 0..4 {
        nav.handle(NavigationKey::Down);
    }
    assert_eq!(nav.cursor(), Some(3));

    nav.replace_list(2, true);
    assert_eq!(nav.cursor(), None);
    assert_eq!(nav.handle(NavigationKey::Up), NavigationOutcome::Moved(1));
}
