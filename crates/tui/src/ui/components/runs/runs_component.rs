//! Renders the runs table and opens a run on Enter or click.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use flowdash_types::{Effect, ExecOutcome, Msg, Operation, RunStatus, WorkflowRun};
use flowdash_util::format_timestamp;
use ratatui::{
    Frame,
    layout::{Constraint, Position, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use super::state::{EMPTY_RUNS_TEXT, RunsState};
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{self as th, build_hint_spans};

#[derive(Debug, Default)]
pub struct RunsComponent {
    /// Area of the table body (below the header row) from the last render
    body_area: Rect,
}

fn status_cell(run: &WorkflowRun, theme: &dyn Theme) -> Cell<'static> {
    let style = match run.status {
        RunStatus::Running => theme.status_info(),
        RunStatus::Finished => theme.status_success(),
        RunStatus::Failed => theme.status_error(),
        RunStatus::Canceled => theme.status_warning(),
        RunStatus::Unknown => theme.text_muted_style(),
    };
    Cell::from(Line::from(vec![
        Span::styled(run.status.to_string(), style),
        Span::styled(format!(" ({}/{})", run.finished_jobs, run.total_jobs), theme.text_secondary_style()),
    ]))
}

impl Component for RunsComponent {
    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        app.runs = RunsState::new();
        *self = Self::default();
        vec![Effect::LoadRuns]
    }

    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let Msg::ExecCompleted(outcome) = msg else {
            return Vec::new();
        };
        match *outcome {
            ExecOutcome::RunsLoaded(runs) => app.runs.set_runs(runs),
            // Already logged by the app; the page stays empty.
            ExecOutcome::Failed {
                operation: Operation::LoadRuns,
                ..
            } => app.runs.set_runs(Vec::new()),
            _ => {}
        }
        Vec::new()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Up => app.runs.select_prev(),
            KeyCode::Down => app.runs.select_next(),
            KeyCode::Home => app.runs.select(0),
            KeyCode::End => app.runs.select(app.runs.runs().len().saturating_sub(1)),
            KeyCode::Enter => return app.runs.open_selected(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position::new(mouse.column, mouse.row);
        if !self.body_area.contains(position) {
            return Vec::new();
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => app.runs.select_next(),
            MouseEventKind::ScrollUp => app.runs.select_prev(),
            MouseEventKind::Down(MouseButton::Left) => {
                app.focus.focus(&app.runs.f_table);
                let row = (mouse.row - self.body_area.y) as usize + app.runs.table_state.offset();
                if row < app.runs.runs().len() {
                    app.runs.select(row);
                    return app.runs.open_selected();
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let focused = app.runs.f_table.get();
        let block = th::block(theme, Some("Workflows"), focused);
        let inner = block.inner(rect);

        if app.runs.is_empty() {
            self.body_area = Rect::default();
            let empty = Paragraph::new(Span::styled(EMPTY_RUNS_TEXT, theme.text_muted_style())).block(block);
            frame.render_widget(empty, rect);
            return;
        }

        let header = Row::new(["ID", "Status", "Created"].map(|title| Cell::from(title).style(th::table_header_style(theme))))
            .style(th::table_header_row_style(theme));
        let rows: Vec<Row> = app
            .runs
            .runs()
            .iter()
            .enumerate()
            .map(|(index, run)| {
                Row::new(vec![
                    Cell::from(run.id.clone()),
                    status_cell(run, theme),
                    Cell::from(format_timestamp(&run.created_at)),
                ])
                .style(th::table_row_style(theme, index))
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Percentage(30), Constraint::Percentage(35), Constraint::Percentage(35)],
        )
        .header(header)
        .block(block)
        .row_highlight_style(th::table_selected_style(theme))
        .highlight_symbol(if focused { "› " } else { "  " });
        frame.render_stateful_widget(table, rect, &mut app.runs.table_state);

        self.body_area = Rect {
            y: inner.y.saturating_add(1),
            height: inner.height.saturating_sub(1),
            ..inner
        };
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[(" ↑/↓", " Select "), (" Enter", " Open "), (" Tab", " Next panel ")])
    }
}
