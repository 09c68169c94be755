//! State for the definitions view.
//!
//! Fetched definitions are keyed by id. Values typed into the directory fields
//! are staged per definition id, never by list position, so reordering or
//! reloading the list cannot attach input to the wrong definition.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use flowdash_types::{CreateRunRequest, Effect, Route, WorkflowDefinition};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use crate::ui::components::common::TextInputState;

/// Row alert shown when a run is attempted without both directories.
pub const MISSING_DIRECTORIES_ALERT: &str = "Input and output directories are required";

/// Page alert shown when the definitions could not be fetched.
pub const LOAD_FAILED_ALERT: &str = "Could not load workflow definitions. See logs (Ctrl+L).";

/// Orders ids numerically; ids that are not integers sort after all numeric
/// ids, lexically among themselves.
pub fn definition_order(left: &str, right: &str) -> Ordering {
    match (left.trim().parse::<i128>(), right.trim().parse::<i128>()) {
        (Ok(l), Ok(r)) => l.cmp(&r).then_with(|| left.cmp(right)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => left.cmp(right),
    }
}

/// Transient run parameters for one definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedRun {
    pub input_dir: TextInputState,
    pub output_dir: TextInputState,
    pub alert: Option<String>,
}

/// Editable field of an expanded definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionField {
    InputDir,
    OutputDir,
}

#[derive(Debug)]
pub struct DefinitionsState {
    definitions: BTreeMap<String, WorkflowDefinition>,
    staged: HashMap<String, StagedRun>,
    selected: usize,
    expanded: Option<String>,
    alert: Option<String>,

    container: FocusFlag,
    pub f_list: FocusFlag,
    pub f_input_dir: FocusFlag,
    pub f_output_dir: FocusFlag,
    pub f_run_button: FocusFlag,
}

impl Default for DefinitionsState {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionsState {
    pub fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
            staged: HashMap::new(),
            selected: 0,
            expanded: None,
            alert: None,
            container: FocusFlag::named("root.definitions"),
            f_list: FocusFlag::named("root.definitions.list"),
            f_input_dir: FocusFlag::named("root.definitions.input_dir"),
            f_output_dir: FocusFlag::named("root.definitions.output_dir"),
            f_run_button: FocusFlag::named("root.definitions.run"),
        }
    }

    /// Replaces the fetched definitions. Staged values for ids that are still
    /// present survive.
    pub fn set_definitions(&mut self, definitions: Vec<WorkflowDefinition>) {
        self.definitions = definitions
            .into_iter()
            .map(|definition| (definition.id.clone(), definition))
            .collect();
        self.staged.retain(|id, _| self.definitions.contains_key(id));
        if self.expanded.as_ref().is_some_and(|id| !self.definitions.contains_key(id)) {
            self.expanded = None;
        }
        self.selected = self.selected.min(self.definitions.len().saturating_sub(1));
        self.alert = None;
    }

    /// Records a failed fetch: the list stays empty and a page alert is shown.
    pub fn set_load_failed(&mut self) {
        self.definitions.clear();
        self.expanded = None;
        self.selected = 0;
        self.alert = Some(LOAD_FAILED_ALERT.to_string());
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Definitions in display order.
    pub fn ordered(&self) -> Vec<&WorkflowDefinition> {
        let mut ordered: Vec<&WorkflowDefinition> = self.definitions.values().collect();
        ordered.sort_by(|left, right| definition_order(&left.id, &right.id));
        ordered
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_definition(&self) -> Option<&WorkflowDefinition> {
        self.ordered().get(self.selected).copied()
    }

    pub fn select(&mut self, index: usize) {
        if index < self.definitions.len() {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        if !self.definitions.is_empty() {
            self.selected = (self.selected + 1) % self.definitions.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.definitions.is_empty() {
            self.selected = (self.selected + self.definitions.len() - 1) % self.definitions.len();
        }
    }

    pub fn expanded_id(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn expanded_definition(&self) -> Option<&WorkflowDefinition> {
        self.expanded.as_ref().and_then(|id| self.definitions.get(id))
    }

    /// Expands the selected definition, or collapses it if already expanded.
    /// Returns whether a definition is now expanded.
    pub fn toggle_selected(&mut self) -> bool {
        let Some(id) = self.selected_definition().map(|definition| definition.id.clone()) else {
            return false;
        };
        if self.expanded.as_deref() == Some(id.as_str()) {
            self.expanded = None;
        } else {
            self.expanded = Some(id);
        }
        self.expanded.is_some()
    }

    pub fn staged(&self, definition_id: &str) -> Option<&StagedRun> {
        self.staged.get(definition_id)
    }

    /// Mutable staged record for one definition, created on first edit.
    pub fn staged_mut(&mut self, definition_id: &str) -> &mut StagedRun {
        self.staged.entry(definition_id.to_string()).or_default()
    }

    /// The staged field of the expanded definition that currently has focus.
    pub fn focused_field(&self) -> Option<DefinitionField> {
        if self.f_input_dir.get() {
            Some(DefinitionField::InputDir)
        } else if self.f_output_dir.get() {
            Some(DefinitionField::OutputDir)
        } else {
            None
        }
    }

    pub fn is_editing(&self) -> bool {
        self.expanded.is_some() && self.focused_field().is_some()
    }

    /// Mutable text state of the focused field of the expanded definition.
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInputState> {
        let field = self.focused_field()?;
        let id = self.expanded.clone()?;
        let staged = self.staged_mut(&id);
        Some(match field {
            DefinitionField::InputDir => &mut staged.input_dir,
            DefinitionField::OutputDir => &mut staged.output_dir,
        })
    }

    /// Validates the staged directories of `definition_id` and, if both are
    /// present, produces exactly one run-creation effect. On failure the row
    /// alert is set and nothing is requested.
    pub fn run(&mut self, definition_id: &str) -> Vec<Effect> {
        if !self.definitions.contains_key(definition_id) {
            return Vec::new();
        }
        let staged = self.staged_mut(definition_id);
        if staged.input_dir.is_blank() || staged.output_dir.is_blank() {
            staged.alert = Some(MISSING_DIRECTORIES_ALERT.to_string());
            return Vec::new();
        }
        staged.alert = None;
        vec![Effect::CreateRun(CreateRunRequest {
            workflow_definition_id: definition_id.to_string(),
            input_dir: staged.input_dir.input().trim().to_string(),
            output_dir: staged.output_dir.input().trim().to_string(),
        })]
    }

    /// Navigation that follows a successful run creation.
    pub fn run_created(&self, run_id: &str) -> Effect {
        Effect::SwitchTo(Route::WorkflowDetail(run_id.to_string()))
    }
}

impl HasFocus for DefinitionsState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_list);
        if self.expanded.is_some() {
            builder.leaf_widget(&self.f_input_dir);
            builder.leaf_widget(&self.f_output_dir);
            builder.leaf_widget(&self.f_run_button);
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
