use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SolverError};

/// Kind of problem the solver should run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    /// Minimum-risk portfolio built from a file of stock tickers
    PortfolioOptimization,
    /// Generic model from variables, objective and constraints
    MathematicalOptimization,
    /// Facility placement (coverage) model
    LocationAnalysis,
}

impl ProblemType {
    pub const ALL: [ProblemType; 3] = [
        ProblemType::PortfolioOptimization,
        ProblemType::MathematicalOptimization,
        ProblemType::LocationAnalysis,
    ];

    /// Wire tag, e.g. `portfolio_optimization`
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::PortfolioOptimization => "portfolio_optimization",
            ProblemType::MathematicalOptimization => "mathematical_optimization",
            ProblemType::LocationAnalysis => "location_analysis",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            ProblemType::PortfolioOptimization => "Portfolio optimization",
            ProblemType::MathematicalOptimization => "Mathematical optimization",
            ProblemType::LocationAnalysis => "Location analysis",
        }
    }

    /// Parse a wire tag (case-insensitive)
    pub fn from_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        ProblemType::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Direction for optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverDirection {
    /// Maximize the objective function
    Maximize,
    /// Minimize the objective function
    Minimize,
}

impl SolverDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverDirection::Maximize => "maximize",
            SolverDirection::Minimize => "minimize",
        }
    }

    /// Parse `minimize`/`maximize`; anything else (including "") is unset
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "maximize" => Some(SolverDirection::Maximize),
            "minimize" => Some(SolverDirection::Minimize),
            _ => None,
        }
    }
}

/// Objective function text and its sense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub formula: String,
    pub sense: SolverDirection,
}

/// A named key/value model parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

/// An opaque data file passed through to the solver untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Form field names understood by the solver endpoint
pub mod fields {
    pub const PROBLEM_TYPE: &str = "problemType";
    pub const OBJECTIVE: &str = "objective";
    pub const VARIABLES: &str = "variables";
    pub const CONSTRAINTS: &str = "constraints";
    pub const PARAMETERS: &str = "parameters";
    pub const FILE: &str = "file";
}

/// Everything sent to the solver in one multipart request.
///
/// `None` means the field is not part of the request at all, which is how
/// groups irrelevant to the problem type are left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub problem_type: ProblemType,
    pub objective: Option<Objective>,
    pub variables: Option<Vec<String>>,
    pub constraints: Option<Vec<String>>,
    pub parameters: Option<Vec<Parameter>>,
    pub files: Vec<FilePart>,
}

impl SubmissionPayload {
    /// The JSON-encoded text parts of the request, in wire order
    pub fn text_fields(&self) -> Result<Vec<(&'static str, String)>> {
        let mut out = vec![(fields::PROBLEM_TYPE, encode(&self.problem_type)?)];
        if let Some(objective) = &self.objective {
            out.push((fields::OBJECTIVE, encode(objective)?));
        }
        if let Some(variables) = &self.variables {
            out.push((fields::VARIABLES, encode(variables)?));
        }
        if let Some(constraints) = &self.constraints {
            out.push((fields::CONSTRAINTS, encode(constraints)?));
        }
        if let Some(parameters) = &self.parameters {
            let map: Map<String, Value> = parameters
                .iter()
                .map(|p| (p.key.clone(), Value::String(p.value.clone())))
                .collect();
            out.push((fields::PARAMETERS, encode(&map)?));
        }
        Ok(out)
    }

    /// Build the multipart body
    pub fn into_form(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.text_fields()? {
            form = form.text(name, value);
        }
        for file in self.files {
            let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = file.content_type {
                part = part
                    .mime_str(&content_type)
                    .map_err(|e| SolverError::InvalidRequest(e.to_string()))?;
            }
            form = form.part(fields::FILE, part);
        }
        Ok(form)
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| SolverError::InvalidRequest(e.to_string()))
}

/// One row of a tabular report
pub type Record = Map<String, Value>;

/// The `result` section of a solution
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Newline separated report; line 0 is ignored, line 1 is the heading
    Text(String),
    /// Uniform records rendered as a table
    Table(Vec<Record>),
    /// Any other JSON value; kept so it survives storage, never rendered
    Unrecognized(Value),
}

impl Report {
    fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Report::Text(text),
            Value::Array(items) if items.iter().all(Value::is_object) => Report::Table(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(record) => Some(record),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Report::Unrecognized(other),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Report::Text(text) => Value::String(text),
            Report::Table(records) => Value::Array(records.into_iter().map(Value::Object).collect()),
            Report::Unrecognized(value) => value,
        }
    }
}

/// The `fig` section of a solution: base64 encoded images
#[derive(Debug, Clone, PartialEq)]
pub enum Figures {
    Single(String),
    Many(Vec<String>),
    Unrecognized(Value),
}

impl Figures {
    fn from_value(value: Value) -> Self {
        match value {
            Value::String(image) => Figures::Single(image),
            Value::Array(items) if items.iter().all(Value::is_string) => Figures::Many(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(image) => Some(image),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Figures::Unrecognized(other),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Figures::Single(image) => Value::String(image),
            Figures::Many(images) => Value::Array(images.into_iter().map(Value::String).collect()),
            Figures::Unrecognized(value) => value,
        }
    }
}

/// Decoded response from the solver.
///
/// Both sections are optional; their shape is decided once, at decode time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawSolution", into = "RawSolution")]
pub struct Solution {
    pub result: Option<Report>,
    pub fig: Option<Figures>,
}

#[derive(Serialize, Deserialize)]
struct RawSolution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fig: Option<Value>,
}

impl From<RawSolution> for Solution {
    fn from(raw: RawSolution) -> Self {
        Solution {
            result: raw.result.map(Report::from_value),
            fig: raw.fig.map(Figures::from_value),
        }
    }
}

impl From<Solution> for RawSolution {
    fn from(solution: Solution) -> Self {
        RawSolution {
            result: solution.result.map(Report::into_value),
            fig: solution.fig.map(Figures::into_value),
        }
    }
}
