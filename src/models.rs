use milp_api_sdk::{FilePart, SolverDirection};

use crate::controller::FormAction;
use crate::domain::form::FormEdits;
use crate::domain::problem_type::ProblemType;

// ---------- Field names of the rendered problem form ----------

pub const PROBLEM_TYPE: &str = "problem_type";
pub const OBJECTIVE_FORMULA: &str = "objective_formula";
pub const OBJECTIVE_SENSE: &str = "objective_sense";
pub const PARAMETER_KEY: &str = "parameter_key";
pub const PARAMETER_VALUE: &str = "parameter_value";
pub const VARIABLE: &str = "variable";
pub const CONSTRAINT: &str = "constraint";
pub const FILE: &str = "file";
pub const ACTION: &str = "action";

/// A decoded post of the problem form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostedForm {
    pub edits: FormEdits,
    pub action: FormAction,
}

impl PostedForm {
    /// Record one text part. Repeated names append in posting order.
    pub fn push_text(&mut self, name: &str, value: String) {
        let edits = &mut self.edits;
        match name {
            PROBLEM_TYPE => edits.problem_type = Some(ProblemType::from_tag(&value)),
            OBJECTIVE_FORMULA => edits.objective_formula = Some(value),
            OBJECTIVE_SENSE => edits.objective_sense = Some(SolverDirection::from_str_opt(&value)),
            PARAMETER_KEY => edits.parameter_keys.get_or_insert_with(Vec::new).push(value),
            PARAMETER_VALUE => edits.parameter_values.get_or_insert_with(Vec::new).push(value),
            VARIABLE => edits.variables.get_or_insert_with(Vec::new).push(value),
            CONSTRAINT => edits.constraints.get_or_insert_with(Vec::new).push(value),
            ACTION => {
                if let Some(action) = FormAction::parse(&value) {
                    self.action = action;
                }
            }
            _ => {}
        }
    }

    /// Record an uploaded file; the empty part of an untouched file input is skipped
    pub fn push_file(&mut self, file: FilePart) {
        if file.file_name.is_empty() && file.bytes.is_empty() {
            return;
        }
        self.edits.files.push(file);
    }
}
