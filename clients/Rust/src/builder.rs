use crate::error::{Result, SolverError};
use crate::types::{FilePart, Objective, Parameter, ProblemType, SolverDirection, SubmissionPayload};

/// Builder for constructing submissions with a fluent API
#[derive(Debug)]
pub struct SubmissionBuilder {
    problem_type: ProblemType,
    objective: Option<(String, Option<SolverDirection>)>,
    variables: Option<Vec<String>>,
    constraints: Option<Vec<String>>,
    parameters: Option<Vec<Parameter>>,
    files: Vec<FilePart>,
}

impl SubmissionBuilder {
    /// Create a new builder for the given problem type
    pub fn new(problem_type: ProblemType) -> Self {
        Self {
            problem_type,
            objective: None,
            variables: None,
            constraints: None,
            parameters: None,
            files: Vec::new(),
        }
    }

    /// Set the objective formula and its sense
    ///
    /// A `None` sense is rejected by [`SubmissionBuilder::build`].
    ///
    /// # Example
    ///
    /// ```
    /// use milp_api_sdk::{ProblemType, SolverDirection, SubmissionBuilder};
    ///
    /// let builder = SubmissionBuilder::new(ProblemType::MathematicalOptimization)
    ///     .objective("sum_i (c_i * x_i)", Some(SolverDirection::Minimize));
    /// ```
    pub fn objective(mut self, formula: impl Into<String>, sense: Option<SolverDirection>) -> Self {
        self.objective = Some((formula.into(), sense));
        self
    }

    /// Add a decision variable declaration, e.g. `x^{Plant,H}`
    pub fn add_variable(mut self, variable: impl Into<String>) -> Self {
        self.variables.get_or_insert_with(Vec::new).push(variable.into());
        self
    }

    /// Send the variables field even when no variable has been added
    pub fn with_variables(mut self) -> Self {
        self.variables.get_or_insert_with(Vec::new);
        self
    }

    /// Add a free-text constraint expression
    ///
    /// # Example
    ///
    /// ```
    /// use milp_api_sdk::{ProblemType, SubmissionBuilder};
    ///
    /// let builder = SubmissionBuilder::new(ProblemType::LocationAnalysis)
    ///     .add_constraint("sum(Cost_t * build_t) <= budget");
    /// ```
    pub fn add_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.get_or_insert_with(Vec::new).push(constraint.into());
        self
    }

    /// Send the constraints field even when no constraint has been added
    pub fn with_constraints(mut self) -> Self {
        self.constraints.get_or_insert_with(Vec::new);
        self
    }

    /// Add a model parameter. A later parameter with the same key wins.
    pub fn add_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(Parameter {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Send the parameters field even when no parameter has been added
    pub fn with_parameters(mut self) -> Self {
        self.parameters.get_or_insert_with(Vec::new);
        self
    }

    /// Attach a data file
    pub fn add_file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }

    /// Attach several data files
    pub fn add_files(mut self, files: Vec<FilePart>) -> Self {
        self.files.extend(files);
        self
    }

    /// Build the submission
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An objective was given with a blank formula or without a sense
    /// - A variable or constraint is blank
    /// - A parameter has a blank key
    pub fn build(self) -> Result<SubmissionPayload> {
        let objective = match self.objective {
            None => None,
            Some((formula, _)) if formula.trim().is_empty() => {
                return Err(SolverError::InvalidRequest(
                    "Objective formula must not be empty".to_string(),
                ));
            }
            Some((formula, sense)) => {
                let sense = sense.ok_or_else(|| {
                    SolverError::InvalidRequest(
                        "Objective sense (minimize/maximize) must be set".to_string(),
                    )
                })?;
                Some(Objective { formula, sense })
            }
        };

        for (field, values) in [("variable", &self.variables), ("constraint", &self.constraints)] {
            if values.iter().flatten().any(|v| v.trim().is_empty()) {
                return Err(SolverError::InvalidRequest(format!(
                    "A {} must not be empty",
                    field
                )));
            }
        }

        if self.parameters.iter().flatten().any(|p| p.key.trim().is_empty()) {
            return Err(SolverError::InvalidRequest(
                "Parameter keys must not be empty".to_string(),
            ));
        }

        Ok(SubmissionPayload {
            problem_type: self.problem_type,
            objective,
            variables: self.variables,
            constraints: self.constraints,
            parameters: self.parameters,
            files: self.files,
        })
    }
}
