use std::cmp::Reverse;

use flowdash_types::{Effect, Route, WorkflowRun};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::TableState};

pub const EMPTY_RUNS_TEXT: &str = "You did not run any workflows yet";

#[derive(Debug)]
pub struct RunsState {
    runs: Vec<WorkflowRun>,
    pub table_state: TableState,
    container: FocusFlag,
    pub f_table: FocusFlag,
}

impl Default for RunsState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunsState {
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            table_state: TableState::default(),
            container: FocusFlag::named("root.runs"),
            f_table: FocusFlag::named("root.runs.table"),
        }
    }

    /// Stores the fetched collection sorted by creation time, newest first.
    pub fn set_runs(&mut self, mut runs: Vec<WorkflowRun>) {
        runs.sort_by_key(|run| Reverse(run.created_at));
        self.runs = runs;
        let selected = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select((!self.runs.is_empty()).then(|| selected.min(self.runs.len() - 1)));
    }

    pub fn runs(&self) -> &[WorkflowRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn selected_run(&self) -> Option<&WorkflowRun> {
        self.table_state.selected().and_then(|index| self.runs.get(index))
    }

    pub fn select(&mut self, index: usize) {
        if index < self.runs.len() {
            self.table_state.select(Some(index));
        }
    }

    pub fn select_next(&mut self) {
        if self.runs.is_empty() {
            return;
        }
        let next = self.table_state.selected().map_or(0, |index| (index + 1).min(self.runs.len() - 1));
        self.table_state.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.runs.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |index| index.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    /// Navigation to the detail page of the selected run.
    pub fn open_selected(&self) -> Vec<Effect> {
        self.selected_run()
            .map(|run| vec![Effect::SwitchTo(Route::WorkflowDetail(run.id.clone()))])
            .unwrap_or_default()
    }
}

impl HasFocus for RunsState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_table);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use flowdash_types::RunStatus;

    fn run(id: &str, created_secs: i64) -> WorkflowRun {
        WorkflowRun {
            id: id.to_string(),
            status: RunStatus::Finished,
            created_at: Utc.timestamp_opt(created_secs, 0).single().unwrap_or_default(),
            total_jobs: 2,
            finished_jobs: 2,
        }
    }

    #[test]
    fn runs_sort_newest_first() {
        let mut state = RunsState::new();
        state.set_runs(vec![run("old", 10), run("new", 30), run("mid", 20)]);
        let ids: Vec<&str> = state.runs().iter().map(|run| run.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old"]);
        assert_eq!(state.selected_run().map(|run| run.id.as_str()), Some("new"));
    }

    #[test]
    fn opening_a_row_targets_its_detail_route() {
        let mut state = RunsState::new();
        state.set_runs(vec![run("R", 1), run("S", 2)]);
        state.select_next();
        let effects = state.open_selected();
        assert_eq!(effects, vec![Effect::SwitchTo(Route::WorkflowDetail("R".into()))]);
        assert_eq!(Route::WorkflowDetail("R".into()).path(), "/workflow/R");
    }

    #[test]
    fn empty_collection_opens_nothing() {
        let mut state = RunsState::new();
        state.set_runs(Vec::new());
        assert!(state.is_empty());
        assert!(state.open_selected().is_empty());
        state.select_next();
        assert_eq!(state.table_state.selected(), None);
    }
}
