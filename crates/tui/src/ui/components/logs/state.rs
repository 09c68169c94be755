use std::collections::VecDeque;

use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};

/// Oldest entries are dropped past this many.
pub const MAX_LOG_ENTRIES: usize = 500;

#[derive(Debug)]
pub struct LogsState {
    entries: VecDeque<String>,
    /// Whether the panel is shown next to the content view.
    pub is_visible: bool,
    pub list_state: ListState,
    /// Focus flag for rat-focus integration
    pub container_focus: FocusFlag,
}

impl Default for LogsState {
    fn default() -> Self {
        Self {
            entries: VecDeque::from([String::from("Welcome to Flowdash")]),
            is_visible: false,
            list_state: ListState::default(),
            container_focus: FocusFlag::named("root.logs"),
        }
    }
}

impl LogsState {
    pub fn append(&mut self, message: String) {
        if self.entries.len() == MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn toggle_visible(&mut self) {
        self.is_visible = !self.is_visible;
    }
}

impl HasFocus for LogsState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_capped() {
        let mut logs = LogsState::default();
        for index in 0..MAX_LOG_ENTRIES + 10 {
            logs.append(format!("line {index}"));
        }
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs.entries().next(), Some("line 10"));
        assert_eq!(logs.latest(), Some(format!("line {}", MAX_LOG_ENTRIES + 9).as_str()));
    }
}
