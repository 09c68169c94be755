use flowdash_types::Route;
use ratatui::layout::Rect;

/// One navigable entry of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry {
    pub path: &'static str,
    pub label: &'static str,
}

impl HeaderEntry {
    /// Route this entry activates.
    pub fn route(&self) -> Option<Route> {
        Route::parse(self.path)
    }
}

/// Header entries in display order. Number keys `1`.. activate them.
pub const HEADER_ROUTES: [HeaderEntry; 2] = [
    HeaderEntry { path: "/", label: "Home" },
    HeaderEntry {
        path: "/workflows",
        label: "Workflows",
    },
];

/// Index of the entry matching `route` by exact path.
pub fn active_entry_index(route: &Route) -> Option<usize> {
    let path = route.path();
    HEADER_ROUTES.iter().position(|entry| entry.path == path)
}

/// Hit-test bookkeeping from the last render.
#[derive(Debug, Default, Clone)]
pub struct HeaderState {
    pub last_area: Rect,
    pub per_item_areas: Vec<Rect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_paths_are_highlighted() {
        assert_eq!(active_entry_index(&Route::Home), Some(0));
        assert_eq!(active_entry_index(&Route::Workflows), Some(1));
        assert_eq!(active_entry_index(&Route::WorkflowDetail("7".into())), None);
    }

    #[test]
    fn every_entry_resolves_to_a_route() {
        let routes: Vec<Route> = HEADER_ROUTES.iter().filter_map(HeaderEntry::route).collect();
        assert_eq!(routes, vec![Route::Home, Route::Workflows]);
    }
}
