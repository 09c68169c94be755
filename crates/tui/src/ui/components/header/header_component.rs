use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use flowdash_types::Effect;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::state::{HEADER_ROUTES, active_entry_index};
use crate::app::App;
use crate::ui::components::component::{Component, find_target_index_by_mouse_position};
use crate::ui::theme::theme_helpers as th;

const TITLE: &str = "flowdash";
const SIGN_OUT_LABEL: &str = "Sign out";

#[derive(Debug, Default)]
pub struct HeaderComponent;

impl HeaderComponent {
    fn activate(index: usize) -> Vec<Effect> {
        HEADER_ROUTES
            .get(index)
            .and_then(|entry| entry.route())
            .map(|route| vec![Effect::SwitchTo(route)])
            .unwrap_or_default()
    }
}

impl Component for HeaderComponent {
    /// Number keys activate entries by position.
    fn handle_key_events(&mut self, _app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char(digit @ '1'..='9') => Self::activate(digit as usize - '1' as usize),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let header = &app.header;
        find_target_index_by_mouse_position(&header.last_area, &header.per_item_areas, mouse.column, mouse.row)
            .map(Self::activate)
            .unwrap_or_default()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, None, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = self.get_preferred_layout(app, inner);
        let active = active_entry_index(&app.current_route);

        frame.render_widget(Paragraph::new(Span::styled(TITLE, theme.accent_emphasis_style())), layout[0]);

        let item_areas = &layout[1..=HEADER_ROUTES.len()];
        for (index, (entry, item_area)) in HEADER_ROUTES.iter().zip(item_areas).enumerate() {
            let style = if active == Some(index) {
                theme.accent_emphasis_style().add_modifier(Modifier::UNDERLINED)
            } else {
                theme.text_secondary_style()
            };
            let line = Line::from(vec![
                Span::styled(format!("{} ", index + 1), theme.text_muted_style()),
                Span::styled(entry.label, style),
            ]);
            frame.render_widget(Paragraph::new(line), *item_area);
        }

        let status_area = layout[HEADER_ROUTES.len() + 1];
        if let Some(frame_symbol) = app.throbber() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("{frame_symbol} loading"), theme.status_info())),
                status_area,
            );
        }

        // Static link text; following it is left to the terminal.
        let sign_out = Line::from(vec![
            Span::styled(SIGN_OUT_LABEL, theme.accent_primary_style().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", app.ctx.sign_out_url), theme.text_muted_style()),
        ])
        .right_aligned();
        frame.render_widget(Paragraph::new(sign_out), layout[HEADER_ROUTES.len() + 2]);

        app.header.last_area = inner;
        app.header.per_item_areas = item_areas.to_vec();
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let mut constraints = vec![Constraint::Length(TITLE.len() as u16 + 3)];
        constraints.extend(
            HEADER_ROUTES
                .iter()
                .map(|entry| Constraint::Length(entry.label.chars().count() as u16 + 4)),
        );
        constraints.push(Constraint::Length(12)); // throbber
        let sign_out_width = SIGN_OUT_LABEL.len() + 1 + app.ctx.sign_out_url.chars().count();
        constraints.push(Constraint::Min(sign_out_width as u16));
        Layout::horizontal(constraints).split(area).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use crossterm::event::KeyModifiers;
    use flowdash_types::Route;

    #[test]
    fn number_keys_switch_routes() {
        let mut app = test_app();
        let mut header = HeaderComponent;
        let effects = header.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::Workflows)]);
        let effects = header.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::Home)]);
        assert!(header.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE)).is_empty());
    }

    #[test]
    fn clicks_hit_rendered_entries() {
        let mut app = test_app();
        app.header.last_area = Rect::new(0, 0, 80, 1);
        app.header.per_item_areas = vec![Rect::new(11, 0, 8, 1), Rect::new(19, 0, 13, 1)];
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 20,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(HeaderComponent.handle_mouse_events(&mut app, click), vec![Effect::SwitchTo(Route::Workflows)]);
    }
}
