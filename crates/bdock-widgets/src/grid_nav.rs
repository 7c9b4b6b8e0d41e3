#![forbid(unsafe_code)]

//! Grid-style arrow-key navigation over a flat list of items.
//!
//! Items are laid out row-major in `columns` columns. The navigator is pure:
//! given the item count and the focused index it returns the index to focus.
//!
//! # Invariants
//!
//! - The result is always `< count`.
//! - No focused item, an empty list, or a focused index outside the list
//!   yields `None` (the key is left to the host).
//! - With `wrap`, moves past either end continue from the other end;
//!   without it they clamp.

use bdock_core::config::SidebarConfig;
use bdock_core::event::{KeyCode, KeyEvent};

/// Arrow-key grid navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridNavigator {
    columns: usize,
    wrap: bool,
}

impl Default for GridNavigator {
    fn default() -> Self {
        Self::new(2, true)
    }
}

impl GridNavigator {
    /// A navigator with `columns` columns (at least one).
    #[must_use]
    pub fn new(columns: usize, wrap: bool) -> Self {
        Self {
            columns: columns.max(1),
            wrap,
        }
    }

    #[must_use]
    pub fn from_config(config: &SidebarConfig) -> Self {
        Self::new(config.columns, config.wrap)
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn wraps(&self) -> bool {
        self.wrap
    }

    /// Index to focus after `key`, or `None` when the key is not handled.
    #[must_use]
    pub fn handle_key(&self, key: &KeyEvent, count: usize, focused: Option<usize>) -> Option<usize> {
        if key.has_command_modifier() {
            return None;
        }
        let current = focused.filter(|&i| i < count)?;
        let last = count - 1;
        let target = match key.code {
            KeyCode::Left => self.step_back(current, 1, count),
            KeyCode::Right => self.step_forward(current, 1, count),
            KeyCode::Up => self.step_back(current, self.columns, count),
            KeyCode::Down => self.step_forward(current, self.columns, count),
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => return None,
        };
        Some(target)
    }

    fn step_forward(&self, current: usize, by: usize, count: usize) -> usize {
        if self.wrap {
            (current + by) % count
        } else {
            (current + by).min(count - 1)
        }
    }

    fn step_back(&self, current: usize, by: usize, count: usize) -> usize {
        if self.wrap {
            (current + count - by % count) % count
        } else {
            current.saturating_sub(by)
        }
    }
}
