//! Renders one run: summary line, action buttons, and the color-coded job
//! list with inline logs for expanded jobs.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use flowdash_types::{Effect, ExecOutcome, Job, Msg, Operation, Route, RunStatus};
use flowdash_util::{format_timestamp, log_lines};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Borders, List, ListItem, ListState, Paragraph},
};
use tracing::debug;

use super::state::{EMPTY_JOBS_TEXT, LOG_REGION_HEIGHT, RunDetailState};
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{self as th, ButtonRenderOptions, build_hint_spans};

const REFRESH_LABEL: &str = "Refresh (r)";
const CANCEL_LABEL: &str = "Cancel (c)";

#[derive(Debug, Default)]
pub struct RunDetailComponent {
    list_state: ListState,
    refresh_area: Rect,
    cancel_area: Rect,
    /// Job index and screen rows of each visible job from the last render
    job_areas: Vec<(usize, Rect)>,
}

fn status_style(status: RunStatus, theme: &dyn Theme) -> ratatui::style::Style {
    match status {
        RunStatus::Running => theme.status_info(),
        RunStatus::Finished => theme.status_success(),
        RunStatus::Failed => theme.status_error(),
        RunStatus::Canceled => theme.status_warning(),
        RunStatus::Unknown => theme.text_muted_style(),
    }
}

/// One list item per job: the job row, then its capped log region when
/// expanded.
fn job_item<'a>(job: &Job, index: usize, state: &RunDetailState, theme: &dyn Theme) -> ListItem<'a> {
    let expanded = state.is_expanded(&job.id);
    let row_style = th::job_row_style(theme, job.state.color(), index);
    let mut lines = vec![Line::from(vec![
        Span::styled(if expanded { "▾ " } else { "▸ " }, row_style),
        Span::styled(job.id.clone(), row_style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", job.state), row_style),
        Span::styled(format!("  {}", format_timestamp(&job.created_at)), row_style),
    ])
    .style(row_style)];

    if expanded {
        let log = log_lines(&job.logs);
        if log.is_empty() {
            lines.push(Line::from(Span::styled("    (no logs)", theme.text_muted_style())));
        }
        let scroll = if index == state.selected_index() { state.log_scroll() } else { 0 };
        let remaining = log.len().saturating_sub(scroll + LOG_REGION_HEIGHT);
        lines.extend(
            log.into_iter()
                .skip(scroll)
                .take(LOG_REGION_HEIGHT)
                .map(|line| Line::from(Span::styled(format!("    {line}"), theme.text_secondary_style()))),
        );
        if remaining > 0 {
            lines.push(Line::from(Span::styled(
                format!("    … {remaining} more lines (PgDn)"),
                theme.text_muted_style(),
            )));
        }
    }
    ListItem::new(lines)
}

impl RunDetailComponent {
    fn render_summary(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.run_detail;
        let title = format!("Workflow {}", state.run_id());
        let block = th::block(theme, Some(title.as_str()), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [summary_area, refresh_area, cancel_area] = Layout::horizontal([
            Constraint::Min(10),
            Constraint::Length(REFRESH_LABEL.len() as u16 + 4),
            Constraint::Length(CANCEL_LABEL.len() as u16 + 4),
        ])
        .areas(inner);

        let summary = match state.detail() {
            Some(detail) => Line::from(vec![
                Span::styled("Status ", theme.text_muted_style()),
                Span::styled(detail.status.to_string(), status_style(detail.status, theme)),
                Span::styled("  Created ", theme.text_muted_style()),
                Span::styled(format_timestamp(&detail.created_at), theme.text_primary_style()),
                Span::styled(format!("  Jobs {}", detail.jobs.len()), theme.text_muted_style()),
            ]),
            None => Line::from(Span::styled("Loading…", theme.text_muted_style())),
        };
        // Vertically center the single summary line within the button row height.
        let summary_line = Rect {
            y: summary_area.y + summary_area.height / 2,
            height: summary_area.height.min(1),
            ..summary_area
        };
        frame.render_widget(Paragraph::new(summary), summary_line);

        let refresh_focused = state.f_refresh.get();
        th::render_button(
            frame,
            refresh_area,
            REFRESH_LABEL,
            theme,
            ButtonRenderOptions::new(true, refresh_focused, refresh_focused, Borders::ALL),
        );
        self.refresh_area = refresh_area;

        if state.can_cancel() {
            let cancel_focused = state.f_cancel.get();
            th::render_button(
                frame,
                cancel_area,
                CANCEL_LABEL,
                theme,
                ButtonRenderOptions::new(true, cancel_focused, cancel_focused, Borders::ALL),
            );
            self.cancel_area = cancel_area;
        } else {
            self.cancel_area = Rect::default();
        }
    }

    fn render_jobs(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.run_detail;
        let focused = state.f_jobs.get();
        let block = th::block(theme, Some("Jobs"), focused);
        let inner = block.inner(area);
        self.job_areas.clear();

        if state.detail().is_some() && state.jobs().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(EMPTY_JOBS_TEXT, theme.text_muted_style())).block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = state
            .jobs()
            .iter()
            .enumerate()
            .map(|(index, job)| job_item(job, index, state, theme))
            .collect();
        let heights: Vec<u16> = items.iter().map(|item| item.height() as u16).collect();

        self.list_state.select((!items.is_empty()).then_some(state.selected_index()));
        let list = List::new(items)
            .block(block)
            .highlight_style(th::table_selected_style(theme))
            .highlight_symbol(if focused { "› " } else { "  " });
        frame.render_stateful_widget(list, area, &mut self.list_state);

        let mut y = inner.y;
        for (index, height) in heights.iter().enumerate().skip(self.list_state.offset()) {
            if y >= inner.bottom() {
                break;
            }
            let visible = (*height).min(inner.bottom() - y);
            self.job_areas.push((index, Rect::new(inner.x, y, inner.width, visible)));
            y += visible;
        }
    }

    fn handle_outcome(&mut self, app: &mut App, outcome: ExecOutcome) -> Vec<Effect> {
        let state = &mut app.run_detail;
        match outcome {
            ExecOutcome::RunDetailLoaded { run_id, detail } => {
                if state.apply_detail(&run_id, detail) {
                    app.rebuild_focus();
                }
                Vec::new()
            }
            ExecOutcome::Failed {
                operation: Operation::LoadRunDetail { run_id },
                ..
            } => state.load_failed(&run_id),
            ExecOutcome::CancelAcknowledged { run_id }
            | ExecOutcome::Failed {
                operation: Operation::CancelRun { run_id },
                ..
            } => state.cancel_settled(&run_id),
            _ => Vec::new(),
        }
    }
}

impl Component for RunDetailComponent {
    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        let Route::WorkflowDetail(run_id) = &app.current_route else {
            return Vec::new();
        };
        debug!(run_id = %run_id, "entering run detail");
        app.run_detail = RunDetailState::new(run_id.clone());
        *self = Self::default();
        app.run_detail.reload()
    }

    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::ExecCompleted(outcome) => self.handle_outcome(app, *outcome),
            _ => Vec::new(),
        }
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let state = &mut app.run_detail;
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Char('r') => return state.reload(),
            KeyCode::Char('c') => return state.cancel(),
            KeyCode::Esc => return vec![Effect::SwitchTo(Route::Workflows)],
            KeyCode::Enter | KeyCode::Char(' ') if state.f_refresh.get() => return state.reload(),
            KeyCode::Enter | KeyCode::Char(' ') if state.f_cancel.get() => return state.cancel(),
            KeyCode::Enter | KeyCode::Char(' ') => state.toggle_selected(),
            KeyCode::Up => state.select_prev(),
            KeyCode::Down => state.select_next(),
            KeyCode::PageDown => state.scroll_logs_down(LOG_REGION_HEIGHT),
            KeyCode::PageUp => state.scroll_logs_up(LOG_REGION_HEIGHT),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position::new(mouse.column, mouse.row);
        let hit_job = self
            .job_areas
            .iter()
            .find(|(_, area)| area.contains(position))
            .map(|(index, _)| *index);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.refresh_area.contains(position) {
                    app.focus.focus(&app.run_detail.f_refresh);
                    return app.run_detail.reload();
                }
                if self.cancel_area.contains(position) {
                    app.focus.focus(&app.run_detail.f_cancel);
                    return app.run_detail.cancel();
                }
                if let Some(index) = hit_job {
                    app.focus.focus(&app.run_detail.f_jobs);
                    app.run_detail.select(index);
                    app.run_detail.toggle_selected();
                }
            }
            MouseEventKind::ScrollDown if hit_job.is_some() => app.run_detail.scroll_logs_down(1),
            MouseEventKind::ScrollUp if hit_job.is_some() => app.run_detail.scroll_logs_up(1),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let layout = self.get_preferred_layout(app, rect);
        self.render_summary(frame, layout[0], app);
        self.render_jobs(frame, layout[1], app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hints = vec![(" ↑/↓", " Select "), (" Enter", " Logs "), (" PgUp/PgDn", " Scroll logs "), (" r", " Refresh ")];
        if app.run_detail.can_cancel() {
            hints.push((" c", " Cancel "));
        }
        hints.push((" Esc", " Back "));
        build_hint_spans(&*app.ctx.theme, &hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([Constraint::Length(5), Constraint::Min(3)]).split(area).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use flowdash_types::{JobState, RunDetail};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn detail(status: RunStatus) -> RunDetail {
        RunDetail {
            id: "R".into(),
            created_at: Utc::now(),
            status,
            jobs: vec![Job {
                id: "j1".into(),
                created_at: Utc::now(),
                state: JobState::ExecutorError,
                logs: "a\nb\n".into(),
            }],
        }
    }

    fn entered(status: RunStatus) -> (App, RunDetailComponent) {
        let mut app = test_app();
        app.current_route = Route::WorkflowDetail("R".into());
        let mut component = RunDetailComponent::default();
        assert_eq!(component.on_route_enter(&mut app), vec![Effect::LoadRunDetail("R".into())]);
        let outcome = ExecOutcome::RunDetailLoaded {
            run_id: "R".into(),
            detail: detail(status),
        };
        component.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome)));
        app.focus.focus(&app.run_detail.f_jobs);
        (app, component)
    }

    #[test]
    fn cancel_key_is_ignored_unless_running() {
        let (mut app, mut component) = entered(RunStatus::Finished);
        assert!(component.handle_key_events(&mut app, key(KeyCode::Char('c'))).is_empty());
    }

    #[test]
    fn cancel_then_reload_once_settled() {
        let (mut app, mut component) = entered(RunStatus::Running);
        let effects = component.handle_key_events(&mut app, key(KeyCode::Char('c')));
        assert_eq!(effects, vec![Effect::CancelRun("R".into())]);

        let ack = ExecOutcome::CancelAcknowledged { run_id: "R".into() };
        let effects = component.handle_message(&mut app, Msg::ExecCompleted(Box::new(ack)));
        assert_eq!(effects, vec![Effect::LoadRunDetail("R".into())]);

        let failed = ExecOutcome::Failed {
            operation: Operation::CancelRun { run_id: "R".into() },
            message: "500".into(),
        };
        let effects = component.handle_message(&mut app, Msg::ExecCompleted(Box::new(failed)));
        assert_eq!(effects, vec![Effect::LoadRunDetail("R".into())]);
    }

    #[test]
    fn expanding_and_collapsing_never_fetches() {
        let (mut app, mut component) = entered(RunStatus::Running);
        assert!(component.handle_key_events(&mut app, key(KeyCode::Enter)).is_empty());
        assert!(app.run_detail.is_expanded("j1"));
        assert!(component.handle_key_events(&mut app, key(KeyCode::Enter)).is_empty());
        assert!(!app.run_detail.is_expanded("j1"));
    }

    #[test]
    fn refresh_key_reloads_the_same_run() {
        let (mut app, mut component) = entered(RunStatus::Finished);
        assert_eq!(
            component.handle_key_events(&mut app, key(KeyCode::Char('r'))),
            vec![Effect::LoadRunDetail("R".into())]
        );
    }

    #[test]
    fn unknown_run_navigates_back_to_runs() {
        let mut app = test_app();
        app.current_route = Route::WorkflowDetail("nope".into());
        let mut component = RunDetailComponent::default();
        component.on_route_enter(&mut app);
        let failed = ExecOutcome::Failed {
            operation: Operation::LoadRunDetail { run_id: "nope".into() },
            message: "404 Not Found".into(),
        };
        let effects = component.handle_message(&mut app, Msg::ExecCompleted(Box::new(failed)));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::Workflows)]);
    }

    #[test]
    fn expanded_job_renders_stripped_log_lines() {
        let (mut app, _) = entered(RunStatus::Running);
        app.run_detail.toggle_selected();
        let job = &app.run_detail.jobs()[0];
        let item = job_item(job, 0, &app.run_detail, &*app.ctx.theme);
        assert_eq!(item.height(), 3);
    }
}
