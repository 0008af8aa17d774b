use milp_api_sdk::{FilePart, SolverDirection, SubmissionBuilder, SubmissionPayload};
use thiserror::Error;

use crate::domain::field_list::{
    ConstraintRow, FieldList, FieldListError, ParameterPatch, ParameterRow, TextRow, VariableRow,
};
use crate::domain::presets::preset;
use crate::domain::problem_type::{FieldGroup, FieldGroupMap, ProblemType};

/// Errors shown to the user on the problem form. None of them are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Select a problem type before running the problem")]
    NoProblemType,

    #[error("Enter an objective formula")]
    MissingObjective,

    #[error("Choose whether to minimize or maximize the objective")]
    MissingSense,

    #[error("A problem is already running; wait for it to finish")]
    AlreadySubmitting,

    #[error("The {} section has no rows", .0.as_str())]
    NotAList(FieldGroup),

    #[error("There is no example problem for {}", .0.label())]
    NoPreset(ProblemType),

    #[error("The form was out of date: {0}")]
    Rows(#[from] FieldListError),

    #[error("The problem could not be prepared: {0}")]
    InvalidPayload(String),

    #[error("The solver failed: {0}")]
    Transport(String),

    #[error("The result could not be saved: {0}")]
    Store(String),
}

/// Objective as edited; an unset sense is allowed while editing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectiveSpec {
    pub formula: String,
    pub sense: Option<SolverDirection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Failed(String),
}

/// Values posted back from the rendered form.
///
/// A `None` field was not on the page and leaves the state untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormEdits {
    pub problem_type: Option<Option<ProblemType>>,
    pub objective_formula: Option<String>,
    pub objective_sense: Option<Option<SolverDirection>>,
    pub parameter_keys: Option<Vec<String>>,
    pub parameter_values: Option<Vec<String>>,
    pub variables: Option<Vec<String>>,
    pub constraints: Option<Vec<String>>,
    pub files: Vec<FilePart>,
}

/// State of one user's problem form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemForm {
    problem_type: Option<ProblemType>,
    objective: ObjectiveSpec,
    parameters: FieldList<ParameterRow>,
    variables: FieldList<VariableRow>,
    constraints: FieldList<ConstraintRow>,
    files: Vec<FilePart>,
    status: FormStatus,
}

impl ProblemForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problem_type(&self) -> Option<ProblemType> {
        self.problem_type
    }

    pub fn objective(&self) -> &ObjectiveSpec {
        &self.objective
    }

    pub fn parameters(&self) -> &FieldList<ParameterRow> {
        &self.parameters
    }

    pub fn variables(&self) -> &FieldList<VariableRow> {
        &self.variables
    }

    pub fn constraints(&self) -> &FieldList<ConstraintRow> {
        &self.constraints
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Switch problem type, resetting every group the new type does not use
    pub fn select_problem_type(&mut self, problem_type: Option<ProblemType>, groups: &FieldGroupMap) {
        if self.problem_type == problem_type {
            return;
        }
        self.problem_type = problem_type;

        for group in FieldGroup::ALL {
            let relevant = problem_type.is_some_and(|t| groups.is_relevant(t, group));
            if !relevant {
                self.reset_group(group);
            }
        }
    }

    fn reset_group(&mut self, group: FieldGroup) {
        match group {
            FieldGroup::Files => self.files.clear(),
            FieldGroup::Parameters => self.parameters = FieldList::new(),
            FieldGroup::Variables => self.variables = FieldList::new(),
            FieldGroup::Objective => self.objective = ObjectiveSpec::default(),
            FieldGroup::Constraints => self.constraints = FieldList::new(),
        }
    }

    /// Merge posted values into the state, row by row.
    ///
    /// Either every edit is applied or, on error, none of them.
    pub fn apply_edits(&mut self, edits: FormEdits, groups: &FieldGroupMap) -> Result<(), FormError> {
        let mut next = self.clone();
        if let Some(formula) = edits.objective_formula {
            next.objective.formula = formula;
        }
        if let Some(sense) = edits.objective_sense {
            next.objective.sense = sense;
        }
        if let Some(values) = edits.variables {
            next.variables = overwrite_text(&next.variables, values)?;
        }
        if let Some(values) = edits.constraints {
            next.constraints = overwrite_text(&next.constraints, values)?;
        }
        if edits.parameter_keys.is_some() || edits.parameter_values.is_some() {
            let keys = edits.parameter_keys.unwrap_or_default();
            let values = edits.parameter_values.unwrap_or_default();
            for index in 0..keys.len().max(values.len()) {
                let patch = ParameterPatch {
                    key: keys.get(index).cloned(),
                    value: values.get(index).cloned(),
                };
                next.parameters = next.parameters.update_at(index, patch)?;
            }
        }
        if !edits.files.is_empty() {
            next.files = edits.files;
        }
        if let Some(problem_type) = edits.problem_type {
            next.select_problem_type(problem_type, groups);
        }
        *self = next;
        Ok(())
    }

    pub fn add_row(&mut self, group: FieldGroup) -> Result<(), FormError> {
        match group {
            FieldGroup::Parameters => self.parameters = self.parameters.add(ParameterRow::default()),
            FieldGroup::Variables => self.variables = self.variables.add(TextRow::default()),
            FieldGroup::Constraints => self.constraints = self.constraints.add(TextRow::default()),
            FieldGroup::Files | FieldGroup::Objective => return Err(FormError::NotAList(group)),
        }
        Ok(())
    }

    pub fn remove_row(&mut self, group: FieldGroup, index: usize) -> Result<(), FormError> {
        match group {
            FieldGroup::Parameters => self.parameters = self.parameters.remove_at(index)?,
            FieldGroup::Variables => self.variables = self.variables.remove_at(index)?,
            FieldGroup::Constraints => self.constraints = self.constraints.remove_at(index)?,
            FieldGroup::Files | FieldGroup::Objective => return Err(FormError::NotAList(group)),
        }
        Ok(())
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    /// Fill the form with the example problem of a type
    pub fn load_preset(&mut self, problem_type: ProblemType, groups: &FieldGroupMap) -> Result<(), FormError> {
        let example = preset(problem_type).ok_or(FormError::NoPreset(problem_type))?;
        self.select_problem_type(Some(problem_type), groups);

        let relevant = |group| groups.is_relevant(problem_type, group);
        if relevant(FieldGroup::Parameters) {
            self.parameters = FieldList::from_rows(
                example
                    .parameters
                    .iter()
                    .map(|(key, value)| ParameterRow {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
            );
        }
        if relevant(FieldGroup::Variables) {
            self.variables =
                FieldList::from_rows(example.variables.iter().map(|v| TextRow::new(*v)).collect());
        }
        if relevant(FieldGroup::Constraints) {
            self.constraints =
                FieldList::from_rows(example.constraints.iter().map(|c| TextRow::new(*c)).collect());
        }
        if relevant(FieldGroup::Objective) {
            let (formula, sense) = example.objective;
            self.objective = ObjectiveSpec {
                formula: formula.to_string(),
                sense: Some(sense),
            };
        }
        Ok(())
    }

    /// Validate, flatten the lists into a payload and mark the form busy.
    ///
    /// Blank rows are dropped here and never reach the payload.
    pub fn begin_submission(&mut self, groups: &FieldGroupMap) -> Result<SubmissionPayload, FormError> {
        if self.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        let problem_type = self.problem_type.ok_or(FormError::NoProblemType)?;
        let relevant = |group| groups.is_relevant(problem_type, group);

        let mut builder = SubmissionBuilder::new(problem_type);

        if relevant(FieldGroup::Objective) {
            let formula = self.objective.formula.trim();
            if formula.is_empty() {
                return Err(FormError::MissingObjective);
            }
            let sense = self.objective.sense.ok_or(FormError::MissingSense)?;
            builder = builder.objective(formula, Some(sense));
        }
        if relevant(FieldGroup::Parameters) {
            builder = builder.with_parameters();
            for row in self.parameters.filled() {
                builder = builder.add_parameter(row.key.trim(), row.value.trim());
            }
        }
        if relevant(FieldGroup::Variables) {
            builder = builder.with_variables();
            for row in self.variables.filled() {
                builder = builder.add_variable(row.value.trim());
            }
        }
        if relevant(FieldGroup::Constraints) {
            builder = builder.with_constraints();
            for row in self.constraints.filled() {
                builder = builder.add_constraint(row.value.trim());
            }
        }
        if relevant(FieldGroup::Files) {
            builder = builder.add_files(self.files.clone());
        }

        let payload = builder
            .build()
            .map_err(|e| FormError::InvalidPayload(e.to_string()))?;
        self.status = FormStatus::Submitting;
        Ok(payload)
    }

    /// Leave the busy state, keeping the failure message if there is one
    pub fn finish_submission(&mut self, outcome: Result<(), FormError>) {
        self.status = match outcome {
            Ok(()) => FormStatus::Idle,
            Err(err) => FormStatus::Failed(err.to_string()),
        };
    }

    /// Show an error without leaving the busy state
    pub fn record_error(&mut self, err: &FormError) {
        if !self.is_submitting() {
            self.status = FormStatus::Failed(err.to_string());
        }
    }

    pub fn clear_error(&mut self) {
        if let FormStatus::Failed(_) = self.status {
            self.status = FormStatus::Idle;
        }
    }
}

fn overwrite_text(list: &FieldList<TextRow>, values: Vec<String>) -> Result<FieldList<TextRow>, FieldListError> {
    values
        .into_iter()
        .enumerate()
        .try_fold(list.clone(), |acc, (index, value)| acc.update_at(index, value))
}
