//! Renders the definitions list with its expandable run panel.
//!
//! The list occupies the left column. Expanding a definition shows its
//! directory fields, the Run button and the definition source on the right.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use flowdash_types::{Effect, ExecOutcome, Msg, Operation};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{DefinitionField, DefinitionsState};
use crate::app::App;
use crate::ui::components::common::TextInputState;
use crate::ui::components::component::Component;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{self as th, ButtonRenderOptions, build_hint_spans};

/// Fixed prefix shown in front of both directory fields.
const DIRECTORY_ADORNMENT: &str = "s3://root/";
const RUN_LABEL: &str = "Run";

/// Indices into [`DefinitionsComponent::get_preferred_layout`].
const LIST: usize = 0;
const DETAIL: usize = 1;

#[derive(Debug, Default)]
pub struct DefinitionsComponent {
    list_state: ListState,
    list_inner: Rect,
    input_dir_area: Rect,
    output_dir_area: Rect,
    run_button_area: Rect,
    source_area: Rect,
    source_scroll: u16,
}

impl DefinitionsComponent {
    fn run_expanded(state: &mut DefinitionsState) -> Vec<Effect> {
        match state.expanded_id().map(str::to_string) {
            Some(id) => state.run(&id),
            None => Vec::new(),
        }
    }

    fn toggle_selected(&mut self, app: &mut App) {
        app.definitions.toggle_selected();
        self.source_scroll = 0;
        app.rebuild_focus();
    }

    fn handle_list_keys(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let state = &mut app.definitions;
        match key.code {
            KeyCode::Up => state.select_prev(),
            KeyCode::Down => state.select_next(),
            KeyCode::Home => state.select(0),
            KeyCode::End => state.select(state.len().saturating_sub(1)),
            KeyCode::PageUp => self.source_scroll = self.source_scroll.saturating_sub(10),
            KeyCode::PageDown => self.source_scroll = self.source_scroll.saturating_add(10),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(app),
            _ => {}
        }
        Vec::new()
    }

    fn handle_input_keys(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let state = &mut app.definitions;
        match key.code {
            KeyCode::Enter => return Self::run_expanded(state),
            KeyCode::Esc => app.focus.focus(&app.definitions.f_list),
            KeyCode::Up | KeyCode::Down => {
                let target = match state.focused_field() {
                    Some(DefinitionField::InputDir) => &state.f_output_dir,
                    _ => &state.f_input_dir,
                };
                app.focus.focus(target);
            }
            _ => {
                let Some(input) = state.focused_input_mut() else {
                    return Vec::new();
                };
                edit_input(input, key);
            }
        }
        Vec::new()
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.definitions;
        let focused = state.f_list.get();
        let block = th::block(theme, Some("Workflow definitions"), focused);
        self.list_inner = block.inner(area);

        if let Some(alert) = state.alert() {
            let paragraph = Paragraph::new(Span::styled(alert, theme.status_error()))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        if state.is_empty() {
            let paragraph = Paragraph::new(Span::styled("No workflow definitions", theme.text_muted_style())).block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let expanded = state.expanded_id();
        let items: Vec<ListItem> = state
            .ordered()
            .into_iter()
            .enumerate()
            .map(|(index, definition)| {
                let marker = if expanded == Some(definition.id.as_str()) { "▾ " } else { "▸ " };
                let has_alert = state
                    .staged(&definition.id)
                    .is_some_and(|staged| staged.alert.is_some());
                let name_style = if has_alert {
                    theme.status_warning()
                } else {
                    theme.text_primary_style()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, theme.text_muted_style()),
                    Span::styled(definition.name.clone(), name_style),
                    Span::styled(format!("  #{}", definition.id), theme.text_muted_style()),
                ]))
                .style(th::table_row_style(theme, index))
            })
            .collect();

        self.list_state.select(Some(state.selected_index()));
        let list = List::new(items)
            .block(block)
            .highlight_style(th::table_selected_style(theme))
            .highlight_symbol(if focused { "› " } else { "  " });
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_detail(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.definitions;
        let Some(definition) = state.expanded_definition() else {
            self.input_dir_area = Rect::default();
            self.output_dir_area = Rect::default();
            self.run_button_area = Rect::default();
            self.source_area = Rect::default();
            let block = th::block(theme, Some("Run"), false);
            let hint = Paragraph::new(Span::styled(
                "Select a definition and press Enter to stage a run",
                theme.text_muted_style(),
            ))
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(hint, area);
            return;
        };

        let [input_area, output_area, alert_area, button_row, source_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(area);
        let [button_area, _] = Layout::horizontal([Constraint::Length(RUN_LABEL.len() as u16 + 8), Constraint::Min(0)]).areas(button_row);

        let staged = state.staged(&definition.id);
        let empty = TextInputState::default();
        let input_dir = staged.map(|staged| &staged.input_dir).unwrap_or(&empty);
        let output_dir = staged.map(|staged| &staged.output_dir).unwrap_or(&empty);

        render_directory_input(frame, input_area, theme, "Input directory", input_dir, state.f_input_dir.get());
        render_directory_input(frame, output_area, theme, "Output directory", output_dir, state.f_output_dir.get());

        if let Some(alert) = staged.and_then(|staged| staged.alert.as_deref()) {
            frame.render_widget(Paragraph::new(Span::styled(alert, theme.status_error())), alert_area);
        }

        let run_focused = state.f_run_button.get();
        th::render_button(
            frame,
            button_area,
            RUN_LABEL,
            theme,
            ButtonRenderOptions::new(true, run_focused, run_focused, Borders::ALL),
        );

        let title = format!("Definition: {}", definition.name);
        let block = th::block(theme, Some(title.as_str()), false);
        let lines = numbered_source_lines(&definition.definition_source, theme);
        let max_scroll = (lines.len() as u16).saturating_sub(block.inner(source_area).height);
        self.source_scroll = self.source_scroll.min(max_scroll);
        frame.render_widget(Paragraph::new(lines).block(block).scroll((self.source_scroll, 0)), source_area);

        self.input_dir_area = input_area;
        self.output_dir_area = output_area;
        self.run_button_area = button_area;
        self.source_area = source_area;
    }
}

impl Component for DefinitionsComponent {
    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        app.definitions = DefinitionsState::new();
        *self = Self::default();
        vec![Effect::LoadDefinitions]
    }

    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let Msg::ExecCompleted(outcome) = msg else {
            return Vec::new();
        };
        match *outcome {
            ExecOutcome::DefinitionsLoaded(definitions) => {
                app.definitions.set_definitions(definitions);
                app.rebuild_focus();
            }
            ExecOutcome::Failed {
                operation: Operation::LoadDefinitions,
                ..
            } => {
                app.definitions.set_load_failed();
                app.rebuild_focus();
            }
            ExecOutcome::RunCreated { run_id, .. } => return vec![app.definitions.run_created(&run_id)],
            _ => {}
        }
        Vec::new()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        if app.definitions.is_editing() {
            return self.handle_input_keys(app, key);
        }
        if app.definitions.f_run_button.get() {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => Self::run_expanded(&mut app.definitions),
                KeyCode::Esc => {
                    app.focus.focus(&app.definitions.f_list);
                    Vec::new()
                }
                _ => Vec::new(),
            };
        }
        if app.definitions.f_list.get() {
            return self.handle_list_keys(app, key);
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollDown if self.source_area.contains(position) => {
                self.source_scroll = self.source_scroll.saturating_add(1);
            }
            MouseEventKind::ScrollUp if self.source_area.contains(position) => {
                self.source_scroll = self.source_scroll.saturating_sub(1);
            }
            MouseEventKind::ScrollDown if self.list_inner.contains(position) => app.definitions.select_next(),
            MouseEventKind::ScrollUp if self.list_inner.contains(position) => app.definitions.select_prev(),
            MouseEventKind::Down(MouseButton::Left) => {
                if self.list_inner.contains(position) {
                    app.focus.focus(&app.definitions.f_list);
                    let row = (mouse.row - self.list_inner.y) as usize + self.list_state.offset();
                    if row >= app.definitions.len() {
                        return Vec::new();
                    }
                    if row == app.definitions.selected_index() {
                        self.toggle_selected(app);
                    } else {
                        app.definitions.select(row);
                    }
                } else if self.input_dir_area.contains(position) {
                    app.focus.focus(&app.definitions.f_input_dir);
                } else if self.output_dir_area.contains(position) {
                    app.focus.focus(&app.definitions.f_output_dir);
                } else if self.run_button_area.contains(position) {
                    app.focus.focus(&app.definitions.f_run_button);
                    return Self::run_expanded(&mut app.definitions);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let layout = self.get_preferred_layout(app, rect);
        self.render_list(frame, layout[LIST], app);
        self.render_detail(frame, layout[DETAIL], app);

        if let Some(field) = app.definitions.focused_field()
            && let Some(definition) = app.definitions.expanded_definition()
        {
            let (area, input) = match field {
                DefinitionField::InputDir => (self.input_dir_area, app.definitions.staged(&definition.id).map(|s| &s.input_dir)),
                DefinitionField::OutputDir => (self.output_dir_area, app.definitions.staged(&definition.id).map(|s| &s.output_dir)),
            };
            let columns = input.map(TextInputState::cursor_columns).unwrap_or(0);
            let x = area.x + 1 + (DIRECTORY_ADORNMENT.len() + columns) as u16;
            if area.width > 0 {
                frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(2)), area.y + 1));
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let state = &app.definitions;
        let hints: &[(&str, &str)] = if state.is_editing() {
            &[(" Enter", " Run "), (" ↑/↓", " Switch field "), (" Esc", " Back to list ")]
        } else if state.f_run_button.get() {
            &[(" Enter", " Run "), (" Tab", " Next ")]
        } else {
            &[(" ↑/↓", " Select "), (" Enter", " Expand "), (" Tab", " Next field "), (" PgUp/PgDn", " Scroll source ")]
        };
        build_hint_spans(&*app.ctx.theme, hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area)
            .to_vec()
    }
}

/// Applies a text-editing key to a directory field.
fn edit_input(input: &mut TextInputState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => input.insert_char(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}

fn render_directory_input(frame: &mut Frame, area: Rect, theme: &dyn Theme, title: &str, input: &TextInputState, focused: bool) {
    let block = th::block(theme, Some(title), focused);
    let line = Line::from(vec![
        Span::styled(DIRECTORY_ADORNMENT, theme.text_muted_style()),
        Span::styled(input.input().to_string(), th::input_style(theme, true, focused)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn numbered_source_lines<'a>(source: &'a str, theme: &dyn Theme) -> Vec<Line<'a>> {
    let total = source.lines().count().max(1);
    let width = total.to_string().len();
    source
        .lines()
        .enumerate()
        .map(|(index, line)| {
            Line::from(vec![
                Span::styled(format!("{:>width$} │ ", index + 1), theme.text_muted_style().add_modifier(Modifier::DIM)),
                Span::styled(line, theme.text_primary_style()),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::state::MISSING_DIRECTORIES_ALERT;
    use crate::test_support::test_app;
    use flowdash_types::{CreateRunRequest, Route, WorkflowDefinition};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn definition(id: &str) -> WorkflowDefinition {
        WorkflowDefinition {
            id: id.to_string(),
            name: format!("workflow {id}"),
            definition_source: "steps: []".to_string(),
            input_dir: None,
            output_dir: None,
        }
    }

    fn loaded_app(ids: &[&str]) -> (App, DefinitionsComponent) {
        let mut app = test_app();
        let mut component = DefinitionsComponent::default();
        let effects = component.on_route_enter(&mut app);
        assert_eq!(effects, vec![Effect::LoadDefinitions]);
        let outcome = ExecOutcome::DefinitionsLoaded(ids.iter().map(|id| definition(id)).collect());
        component.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome)));
        app.focus.focus(&app.definitions.f_list);
        (app, component)
    }

    fn type_text(component: &mut DefinitionsComponent, app: &mut App, text: &str) {
        for c in text.chars() {
            component.handle_key_events(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn entering_the_route_requests_definitions_once() {
        let mut app = test_app();
        let mut component = DefinitionsComponent::default();
        assert_eq!(component.on_route_enter(&mut app), vec![Effect::LoadDefinitions]);
    }

    #[test]
    fn load_failure_shows_page_alert() {
        let (mut app, mut component) = loaded_app(&["1"]);
        let outcome = ExecOutcome::Failed {
            operation: Operation::LoadDefinitions,
            message: "connection refused".into(),
        };
        component.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome)));
        assert!(app.definitions.is_empty());
        assert!(app.definitions.alert().is_some());
    }

    #[test]
    fn typing_and_running_emits_a_create_request() {
        let (mut app, mut component) = loaded_app(&["2", "1"]);
        component.handle_key_events(&mut app, key(KeyCode::Down));
        component.handle_key_events(&mut app, key(KeyCode::Enter));
        assert_eq!(app.definitions.expanded_id(), Some("2"));

        component.handle_key_events(&mut app, key(KeyCode::Tab));
        assert!(app.definitions.f_input_dir.get());
        type_text(&mut component, &mut app, "in");
        component.handle_key_events(&mut app, key(KeyCode::Tab));
        assert!(app.definitions.f_output_dir.get());
        type_text(&mut component, &mut app, "out");

        let effects = component.handle_key_events(&mut app, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::CreateRun(CreateRunRequest {
                workflow_definition_id: "2".into(),
                input_dir: "in".into(),
                output_dir: "out".into(),
            })]
        );
    }

    #[test]
    fn run_button_without_directories_sets_row_alert() {
        let (mut app, mut component) = loaded_app(&["1"]);
        component.handle_key_events(&mut app, key(KeyCode::Enter));
        app.focus.focus(&app.definitions.f_run_button);
        let effects = component.handle_key_events(&mut app, key(KeyCode::Enter));
        assert!(effects.is_empty());
        assert_eq!(
            app.definitions.staged("1").and_then(|staged| staged.alert.as_deref()),
            Some(MISSING_DIRECTORIES_ALERT)
        );
    }

    #[test]
    fn shortcut_letters_are_typed_while_editing() {
        let (mut app, mut component) = loaded_app(&["1"]);
        component.handle_key_events(&mut app, key(KeyCode::Enter));
        app.focus.focus(&app.definitions.f_input_dir);
        assert!(app.is_editing_text());
        type_text(&mut component, &mut app, "q1");
        assert_eq!(app.definitions.staged("1").map(|staged| staged.input_dir.input()), Some("q1"));
    }

    #[test]
    fn run_created_navigates_to_the_new_run() {
        let (mut app, mut component) = loaded_app(&["1"]);
        let outcome = ExecOutcome::RunCreated {
            definition_id: "1".into(),
            run_id: "42".into(),
        };
        let effects = component.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome)));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::WorkflowDetail("42".into()))]);
    }

    #[test]
    fn create_failure_is_logged_and_leaves_the_page_as_is() {
        let (mut app, mut component) = loaded_app(&["1"]);
        let logged = app.logs.len();
        let outcome = ExecOutcome::Failed {
            operation: Operation::CreateRun { definition_id: "1".into() },
            message: "HTTP 404".into(),
        };
        let msg = Msg::ExecCompleted(Box::new(outcome));
        app.update(&msg);
        let effects = component.handle_message(&mut app, msg);

        assert!(effects.is_empty());
        assert_eq!(app.logs.len(), logged + 1);
        assert_eq!(app.definitions.len(), 1);
        assert!(app.definitions.alert().is_none());
        assert!(app.definitions.staged("1").and_then(|staged| staged.alert.as_deref()).is_none());
    }
}
