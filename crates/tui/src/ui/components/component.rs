//! Component system for the Flowdash TUI.
//!
//! Components are self-contained UI elements. Their state lives on [`App`]
//! so it can take part in focus management; the component value itself only
//! keeps render-pass bookkeeping such as hit-test rectangles. Side effects are
//! reported back to the runtime as [`Effect`]s instead of being performed
//! directly.

use crossterm::event::{KeyEvent, MouseEvent};
use flowdash_types::{Effect, Msg};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

/// A UI component with its own behavior and rendering.
///
/// Lifecycle: `on_route_enter` runs when the component becomes the content
/// view, the event handlers run while it is mounted, `render` draws it, and
/// `on_route_exit` runs just before it is dropped.
pub(crate) trait Component: std::fmt::Debug {
    /// Handle an application-level message (ticks, completed requests).
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events. Components hit-test against their last render.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hint bar while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Split `area` into the regions this component renders into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }

    /// Called when the component becomes the active view.
    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }

    /// Called before the component is replaced by another view.
    fn on_route_exit(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }
}

/// Returns the index of the rect in `areas` containing the point, if the
/// point falls inside `container`.
pub fn find_target_index_by_mouse_position(container: &Rect, areas: &[Rect], x: u16, y: u16) -> Option<usize> {
    let position = ratatui::layout::Position::new(x, y);
    if !container.contains(position) {
        return None;
    }
    areas.iter().position(|area| area.contains(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_finds_the_containing_area() {
        let container = Rect::new(0, 0, 40, 3);
        let areas = [Rect::new(0, 0, 10, 1), Rect::new(12, 0, 10, 1)];
        assert_eq!(find_target_index_by_mouse_position(&container, &areas, 14, 0), Some(1));
        assert_eq!(find_target_index_by_mouse_position(&container, &areas, 11, 0), None);
        assert_eq!(find_target_index_by_mouse_position(&container, &areas, 14, 5), None);
    }
}
