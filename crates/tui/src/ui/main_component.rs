use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use flowdash_types::{Effect, Msg, Route};
use rat_focus::FocusBuilder;
use ratatui::{
    prelude::*,
    style::Style,
    widgets::Paragraph,
};
use tracing::debug;

use super::components::definitions::DefinitionsComponent;
use super::components::header::HeaderComponent;
use super::components::logs::LogsComponent;
use super::components::run_detail::RunDetailComponent;
use super::components::runs::RunsComponent;
use super::components::Component;
use super::theme::theme_helpers as th;
use crate::app::App;

/// Root component: header on top, the routed content view, the optional
/// logs panel, and the hint bar.
#[derive(Default, Debug)]
pub(crate) struct MainView {
    /// Component of the current route
    pub(crate) content_view: Option<Box<dyn Component>>,
    pub(crate) header_view: HeaderComponent,
    pub(crate) logs_view: LogsComponent,
}

impl MainView {
    /// Mounts the component for `route` and returns the effects of entering
    /// it. Not meant to be called directly; emit `Effect::SwitchTo` instead.
    ///
    /// The previous view is exited and dropped first, so no state fetched
    /// for it survives the navigation.
    pub fn set_current_route(&mut self, app: &mut App, route: Route) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(mut previous) = self.content_view.take() {
            effects.extend(previous.on_route_exit(app));
        }
        debug!(from = %app.current_route.path(), to = %route.path(), "switching route");

        let mut view: Box<dyn Component> = match route {
            Route::Home => Box::new(DefinitionsComponent::default()),
            Route::Workflows => Box::new(RunsComponent::default()),
            Route::WorkflowDetail(_) => Box::new(RunDetailComponent::default()),
        };
        app.current_route = route;
        effects.extend(view.on_route_enter(app));
        self.content_view = Some(view);

        app.focus = FocusBuilder::build_for(app);
        app.focus.first();
        effects
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(&msg);
        self.content_view
            .as_mut()
            .map(|content| content.handle_message(app, msg))
            .unwrap_or_default()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if control => return vec![Effect::Quit],
            KeyCode::Char('l') if control => {
                app.logs.toggle_visible();
                app.rebuild_focus();
                return Vec::new();
            }
            _ => {}
        }

        if !app.is_editing_text() && !control {
            match key.code {
                KeyCode::Char('q') => return vec![Effect::Quit],
                KeyCode::Char('1'..='9') => return self.header_view.handle_key_events(app, key),
                _ => {}
            }
        }

        if app.logs.is_visible && app.logs.container_focus.get() {
            return self.logs_view.handle_key_events(app, key);
        }

        self.content_view
            .as_mut()
            .map(|content| content.handle_key_events(app, key))
            .unwrap_or_default()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let mut effects = self.header_view.handle_mouse_events(app, mouse);
        effects.extend(
            self.content_view
                .as_mut()
                .map(|content| content.handle_mouse_events(app, mouse))
                .unwrap_or_default(),
        );
        effects.extend(self.logs_view.handle_mouse_events(app, mouse));
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        self.header_view.render(frame, layout[0], app);
        if let Some(current) = self.content_view.as_mut() {
            current.render(frame, layout[1], app);
        }
        if app.logs.is_visible {
            self.logs_view.render(frame, layout[2], app);
        }

        let hint_spans = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, layout[3]);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];

        if app.logs.is_visible && app.logs.container_focus.get() {
            hint_spans.extend(self.logs_view.get_hint_spans(app));
        } else if let Some(content) = self.content_view.as_ref() {
            hint_spans.extend(content.get_hint_spans(app));
        }

        hint_spans.extend(th::build_hint_spans(
            &*app.ctx.theme,
            &[(" 1/2", " Pages "), (" Ctrl+L", " Toggle logs "), (" q", " Quit ")],
        ));
        hint_spans
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let rows = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content (+ logs)
            Constraint::Length(1), // Hints bar
        ])
        .split(area);

        // Wide terminals put the logs beside the content, narrow ones below.
        let constraints = if app.logs.is_visible {
            [Constraint::Percentage(70), Constraint::Fill(1)]
        } else {
            [Constraint::Percentage(100), Constraint::Length(0)]
        };
        let body = if rows[1].width >= 141 {
            Layout::horizontal(constraints).split(rows[1])
        } else {
            Layout::vertical(constraints).split(rows[1])
        };

        vec![rows[0], body[0], body[1], rows[2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use flowdash_types::ExecOutcome;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn entering_a_route_mounts_its_view_and_loads_it() {
        let mut app = test_app();
        let mut main = MainView::default();
        let effects = main.set_current_route(&mut app, Route::WorkflowDetail("R".into()));
        assert_eq!(app.current_route, Route::WorkflowDetail("R".into()));
        assert_eq!(effects, vec![Effect::LoadRunDetail("R".into())]);
        assert_eq!(app.run_detail.run_id(), "R");
    }

    #[test]
    fn navigation_discards_the_previous_page_state() {
        let mut app = test_app();
        let mut main = MainView::default();
        main.set_current_route(&mut app, Route::Workflows);
        let outcome = ExecOutcome::RunsLoaded(vec![flowdash_types::WorkflowRun {
            id: "R".into(),
            status: Default::default(),
            created_at: Default::default(),
            total_jobs: 0,
            finished_jobs: 0,
        }]);
        main.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome)));
        assert!(!app.runs.is_empty());

        main.set_current_route(&mut app, Route::Home);
        main.set_current_route(&mut app, Route::Workflows);
        assert!(app.runs.is_empty());
    }

    #[test]
    fn q_quits_unless_typing() {
        let mut app = test_app();
        let mut main = MainView::default();
        main.set_current_route(&mut app, Route::Home);
        assert_eq!(main.handle_key_events(&mut app, key(KeyCode::Char('q'))), vec![Effect::Quit]);
        assert_eq!(
            main.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            vec![Effect::Quit]
        );
    }

    #[test]
    fn digit_keys_navigate_through_the_header() {
        let mut app = test_app();
        let mut main = MainView::default();
        main.set_current_route(&mut app, Route::Home);
        assert_eq!(
            main.handle_key_events(&mut app, key(KeyCode::Char('2'))),
            vec![Effect::SwitchTo(Route::Workflows)]
        );
    }

    #[test]
    fn ctrl_l_toggles_the_logs_panel() {
        let mut app = test_app();
        let mut main = MainView::default();
        main.set_current_route(&mut app, Route::Home);
        let visible = app.logs.is_visible;
        main.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert_eq!(app.logs.is_visible, !visible);
    }
}
