use std::collections::{HashMap, HashSet};

pub use milp_api_sdk::ProblemType;

/// A named section of the problem form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Files,
    Parameters,
    Variables,
    Objective,
    Constraints,
}

impl FieldGroup {
    /// Display order of the groups in the form
    pub const ALL: [FieldGroup; 5] = [
        FieldGroup::Files,
        FieldGroup::Parameters,
        FieldGroup::Variables,
        FieldGroup::Objective,
        FieldGroup::Constraints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldGroup::Files => "files",
            FieldGroup::Parameters => "parameters",
            FieldGroup::Variables => "variables",
            FieldGroup::Objective => "objective",
            FieldGroup::Constraints => "constraints",
        }
    }

    /// Parse a group name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        FieldGroup::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

/// Which field groups each problem type uses.
///
/// Groups missing from a type's set are neither shown nor sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroupMap {
    groups: HashMap<ProblemType, HashSet<FieldGroup>>,
}

impl Default for FieldGroupMap {
    fn default() -> Self {
        use FieldGroup::*;

        let groups = HashMap::from([
            (ProblemType::PortfolioOptimization, HashSet::from([Files])),
            (
                ProblemType::MathematicalOptimization,
                HashSet::from([Files, Variables, Objective, Constraints]),
            ),
            (
                ProblemType::LocationAnalysis,
                HashSet::from([Files, Parameters, Variables, Objective, Constraints]),
            ),
        ]);

        Self { groups }
    }
}

impl FieldGroupMap {
    /// Replace the groups used by one problem type
    pub fn with_groups(mut self, problem_type: ProblemType, groups: HashSet<FieldGroup>) -> Self {
        self.groups.insert(problem_type, groups);
        self
    }

    pub fn is_relevant(&self, problem_type: ProblemType, group: FieldGroup) -> bool {
        self.groups
            .get(&problem_type)
            .is_some_and(|groups| groups.contains(&group))
    }

    /// Groups of a problem type, in display order
    pub fn groups(&self, problem_type: ProblemType) -> Vec<FieldGroup> {
        FieldGroup::ALL
            .into_iter()
            .filter(|g| self.is_relevant(problem_type, *g))
            .collect()
    }

    /// Parse a comma separated list such as `files,variables,objective`
    pub fn parse_groups(s: &str) -> Result<HashSet<FieldGroup>, String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| FieldGroup::from_name(part).ok_or_else(|| format!("unknown field group '{}'", part)))
            .collect()
    }
}
