//! State for the run detail view.
//!
//! Every reload replaces the fetched record wholesale. Expanded jobs are
//! tracked by job id, so toggles survive a reload for jobs that still exist.

use std::collections::HashSet;

use flowdash_types::{Effect, Job, Route, RunDetail};
use flowdash_util::log_lines;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

pub const EMPTY_JOBS_TEXT: &str = "This workflow did not run any jobs yet";

/// Maximum number of log lines shown under an expanded job.
pub const LOG_REGION_HEIGHT: usize = 10;

#[derive(Debug)]
pub struct RunDetailState {
    run_id: String,
    detail: Option<RunDetail>,
    selected: usize,
    expanded: HashSet<String>,
    /// First visible log line of the selected job
    log_scroll: usize,

    container: FocusFlag,
    pub f_jobs: FocusFlag,
    pub f_refresh: FocusFlag,
    pub f_cancel: FocusFlag,
}

impl RunDetailState {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            detail: None,
            selected: 0,
            expanded: HashSet::new(),
            log_scroll: 0,
            container: FocusFlag::named("root.run_detail"),
            f_jobs: FocusFlag::named("root.run_detail.jobs"),
            f_refresh: FocusFlag::named("root.run_detail.refresh"),
            f_cancel: FocusFlag::named("root.run_detail.cancel"),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn detail(&self) -> Option<&RunDetail> {
        self.detail.as_ref()
    }

    pub fn jobs(&self) -> &[Job] {
        self.detail.as_ref().map(|detail| detail.jobs.as_slice()).unwrap_or_default()
    }

    /// Shared by route entry and the refresh action.
    pub fn reload(&self) -> Vec<Effect> {
        vec![Effect::LoadRunDetail(self.run_id.clone())]
    }

    /// Applies a fetched record. Records for another run are ignored.
    /// Returns whether the record was applied.
    pub fn apply_detail(&mut self, run_id: &str, detail: RunDetail) -> bool {
        if run_id != self.run_id {
            return false;
        }
        self.expanded
            .retain(|job_id| detail.jobs.iter().any(|job| &job.id == job_id));
        self.selected = self.selected.min(detail.jobs.len().saturating_sub(1));
        self.detail = Some(detail);
        self.log_scroll = self.log_scroll.min(self.max_log_scroll());
        true
    }

    /// Effects for a failed detail fetch of `run_id`: back to the runs list.
    pub fn load_failed(&self, run_id: &str) -> Vec<Effect> {
        if run_id == self.run_id {
            vec![Effect::SwitchTo(Route::Workflows)]
        } else {
            Vec::new()
        }
    }

    pub fn can_cancel(&self) -> bool {
        self.detail.as_ref().is_some_and(|detail| detail.status.is_cancelable())
    }

    /// Requests cancellation, only while the run is executing.
    pub fn cancel(&self) -> Vec<Effect> {
        if self.can_cancel() {
            vec![Effect::CancelRun(self.run_id.clone())]
        } else {
            Vec::new()
        }
    }

    /// Effects once a cancel call for `run_id` has completed, whatever its
    /// result.
    pub fn cancel_settled(&self, run_id: &str) -> Vec<Effect> {
        if run_id == self.run_id { self.reload() } else { Vec::new() }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.jobs().get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.jobs().len() && index != self.selected {
            self.selected = index;
            self.log_scroll = 0;
        }
    }

    pub fn select_next(&mut self) {
        let next = self.selected + 1;
        self.select(next);
    }

    pub fn select_prev(&mut self) {
        if let Some(prev) = self.selected.checked_sub(1) {
            self.select(prev);
        }
    }

    pub fn is_expanded(&self, job_id: &str) -> bool {
        self.expanded.contains(job_id)
    }

    /// Shows or hides the selected job's logs. Purely local.
    pub fn toggle_selected(&mut self) {
        let Some(job_id) = self.selected_job().map(|job| job.id.clone()) else {
            return;
        };
        if !self.expanded.remove(&job_id) {
            self.expanded.insert(job_id);
        }
        self.log_scroll = 0;
    }

    pub fn log_scroll(&self) -> usize {
        self.log_scroll
    }

    fn max_log_scroll(&self) -> usize {
        self.selected_job()
            .map(|job| log_lines(&job.logs).len().saturating_sub(LOG_REGION_HEIGHT))
            .unwrap_or(0)
    }

    pub fn scroll_logs_down(&mut self, lines: usize) {
        self.log_scroll = (self.log_scroll + lines).min(self.max_log_scroll());
    }

    pub fn scroll_logs_up(&mut self, lines: usize) {
        self.log_scroll = self.log_scroll.saturating_sub(lines);
    }
}

impl HasFocus for RunDetailState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_jobs);
        builder.leaf_widget(&self.f_refresh);
        if self.can_cancel() {
            builder.leaf_widget(&self.f_cancel);
        }
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
    use chrono::Utc;
    use flowdash_types::{JobState, RunStatus};

    fn job(id: &str, logs: &str) -> Job {
        Job {
            id: id.to_string(),
            created_at: Utc::now(),
            state: JobState::Running,
            logs: logs.to_string(),
        }
    }

    fn detail(status: RunStatus, jobs: Vec<Job>) -> RunDetail {
        RunDetail {
            id: "R".into(),
            created_at: Utc::now(),
            status,
            jobs,
        }
    }

    #[test]
    fn reload_targets_the_route_run() {
        let state = RunDetailState::new("R".into());
        assert_eq!(state.reload(), vec![Effect::LoadRunDetail("R".into())]);
        assert_eq!(state.reload(), state.reload());
    }

    #[test]
    fn details_for_other_runs_are_ignored() {
        let mut state = RunDetailState::new("R".into());
        assert!(!state.apply_detail("S", detail(RunStatus::Running, vec![job("j1", "")])));
        assert!(state.detail().is_none());
        assert!(state.apply_detail("R", detail(RunStatus::Running, vec![job("j1", "")])));
        assert_eq!(state.jobs().len(), 1);
    }

    #[test]
    fn cancel_is_only_offered_while_running() {
        let mut state = RunDetailState::new("R".into());
        assert!(state.cancel().is_empty());
        state.apply_detail("R", detail(RunStatus::Finished, Vec::new()));
        assert!(!state.can_cancel());
        assert!(state.cancel().is_empty());
        state.apply_detail("R", detail(RunStatus::Running, Vec::new()));
        assert_eq!(state.cancel(), vec![Effect::CancelRun("R".into())]);
        assert_eq!(state.cancel_settled("R"), vec![Effect::LoadRunDetail("R".into())]);
        assert!(state.cancel_settled("other").is_empty());
    }

    #[test]
    fn load_failure_returns_to_the_runs_list() {
        let state = RunDetailState::new("missing".into());
        assert_eq!(state.load_failed("missing"), vec![Effect::SwitchTo(Route::Workflows)]);
        assert!(state.load_failed("other").is_empty());
    }

    #[test]
    fn expanded_jobs_survive_reload_by_id() {
        let mut state = RunDetailState::new("R".into());
        state.apply_detail("R", detail(RunStatus::Running, vec![job("j1", "a\n"), job("j2", "")]));
        state.toggle_selected();
        assert!(state.is_expanded("j1"));

        state.apply_detail("R", detail(RunStatus::Running, vec![job("j0", ""), job("j1", "a\nb\n")]));
        assert!(state.is_expanded("j1"));

        state.apply_detail("R", detail(RunStatus::Finished, vec![job("j0", "")]));
        assert!(!state.is_expanded("j1"));
    }

    #[test]
    fn toggle_collapses_without_fetching() {
        let mut state = RunDetailState::new("R".into());
        state.apply_detail("R", detail(RunStatus::Running, vec![job("j1", "x")]));
        state.toggle_selected();
        state.toggle_selected();
        assert!(!state.is_expanded("j1"));
    }

    #[test]
    fn log_scroll_is_capped_to_the_region() {
        let logs: String = (0..25).map(|line| format!("line {line}\n")).collect();
        let mut state = RunDetailState::new("R".into());
        state.apply_detail("R", detail(RunStatus::Running, vec![job("j1", &logs)]));
        state.toggle_selected();
        state.scroll_logs_down(100);
        assert_eq!(state.log_scroll(), 25 - LOG_REGION_HEIGHT);
        state.scroll_logs_up(3);
        assert_eq!(state.log_scroll(), 12);
    }
}
