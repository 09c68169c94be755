//! Renders the logs panel and handles its navigation keys.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use flowdash_types::Effect;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers::{self as th, build_hint_spans};

#[derive(Debug, Default)]
pub struct LogsComponent {
    list_area: Rect,
}

impl Component for LogsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Up => app.logs.list_state.select_previous(),
            KeyCode::Down => app.logs.list_state.select_next(),
            KeyCode::PageUp => app.logs.list_state.scroll_up_by(10),
            KeyCode::PageDown => app.logs.list_state.scroll_down_by(10),
            KeyCode::Home => app.logs.list_state.select_first(),
            KeyCode::End => app.logs.list_state.select_last(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !app.logs.is_visible || !self.list_area.contains(Position::new(mouse.column, mouse.row)) {
            return Vec::new();
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => app.logs.list_state.scroll_down_by(1),
            MouseEventKind::ScrollUp => app.logs.list_state.scroll_up_by(1),
            MouseEventKind::Down(_) => app.focus.focus(&app.logs),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let focused = app.logs.container_focus.get();
        let title = format!("Logs ({})", app.logs.len());
        let block = th::block(theme, Some(title.as_str()), focused);
        self.list_area = block.inner(rect);

        let items: Vec<ListItem> = app
            .logs
            .entries()
            .map(|entry| {
                let style = if entry.starts_with("Failed") {
                    theme.status_error()
                } else {
                    theme.text_primary_style()
                };
                ListItem::new(Line::from(Span::styled(entry.to_string(), style)))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(th::table_selected_style(theme))
            .highlight_symbol(if focused { "› " } else { "  " });
        frame.render_stateful_widget(list, rect, &mut app.logs.list_state);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[(" ↑/↓", " Scroll "), (" Tab", " Next panel ")])
    }
}
