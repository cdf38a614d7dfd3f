//! Keyboard navigation over the merged result list
//!
//! The navigator owns the selection cursor and whether the result panel is
//! open. It never looks at the items themselves, only at the list length,
//! so the widget decides what a confirmed index means.

use tracing::trace;

/// Abstract navigation keys, after key bindings have been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKey {
    Up,
    Down,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    /// Panel open but nothing to browse
    Idle,
    /// Panel open over a non-empty list
    Browsing,
    /// Panel hidden; cursor is always cleared in this state
    Closed,
}

/// What a navigation key did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Cursor moved; the host must suppress its default arrow handling
    Moved(usize),
    /// Enter on a valid cursor; the panel is now closed
    Confirmed(usize),
    /// Escape closed the panel
    Closed,
    /// Nothing happened; the key belongs to the host (e.g. caret movement)
    Ignored,
}

impl NavigationOutcome {
    /// Whether the key was consumed by the result list
    pub fn is_consumed(&self) -> bool {
        !matches!(self, NavigationOutcome::Ignored)
    }
}

#[derive(Debug, Clone)]
pub struct KeyboardNavigator {
    cursor: Option<usize>,
    len: usize,
    open: bool,
}

impl Default for KeyboardNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardNavigator {
    pub fn new() -> Self {
        Self {
            cursor: None,
            len: 0,
            open: false,
        }
    }

    pub fn state(&self) -> NavigatorState {
        if !self.open {
            NavigatorState::Closed
        } else if self.len > 0 {
            NavigatorState::Browsing
        } else {
            NavigatorState::Idle
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Cursor in the sentinel form used by the dashboard (-1 for none)
    pub fn cursor_index(&self) -> i64 {
        self.cursor.map(|c| c as i64).unwrap_or(-1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// A new result list arrived. The cursor is always reset.
    pub fn replace_list(&mut self, len: usize, visible: bool) {
        self.len = len;
        self.cursor = None;
        self.open = visible;
        trace!(target: "navigation", "List replaced: len={}, state={:?}", len, self.state());
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the panel and discard the cursor (escape, blur, outside click)
    pub fn close(&mut self) {
        self.open = false;
        self.cursor = None;
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Point the cursor at an index directly (pointer hover)
    pub fn select(&mut self, index: usize) -> bool {
        if self.open && index < self.len {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    pub fn handle(&mut self, key: NavigationKey) -> NavigationOutcome {
        match key {
            NavigationKey::Down => self.step(|cursor, n| match cursor {
                None => 0,
                Some(c) => (c + 1) % n,
            }),
            NavigationKey::Up => self.step(|cursor, n| match cursor {
                None => n - 1,
                Some(c) => (c + n - 1) % n,
            }),
            NavigationKey::Confirm => match self.cursor {
                Some(index) if self.open && index < self.len => {
                    self.close();
                    NavigationOutcome::Confirmed(index)
                }
                _ => NavigationOutcome::Ignored,
            },
            NavigationKey::Cancel => {
                self.close();
                NavigationOutcome::Closed
            }
        }
    }

    fn step(&mut self, next: impl Fn(Option<usize>, usize) -> usize) -> NavigationOutcome {
        if !self.open || self.len == 0 {
            return NavigationOutcome::Ignored;
        }
        let index = next(self.cursor, self.len);
        self.cursor = Some(index);
        NavigationOutcome::Moved(index)
    }
}
