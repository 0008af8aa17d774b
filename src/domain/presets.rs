use milp_api_sdk::SolverDirection;

use crate::domain::problem_type::ProblemType;

/// A ready-made example problem that fills the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub problem_type: ProblemType,
    pub parameters: &'static [(&'static str, &'static str)],
    pub variables: &'static [&'static str],
    pub constraints: &'static [&'static str],
    pub objective: (&'static str, SolverDirection),
}

/// Unit commitment for a fleet of power plants over a day of hourly demand.
/// Expects `plant_capacities`, `demand`, `fuel_costs`, `operating_costs`
/// and `startup_costs` files.
const POWER_PLANT: Preset = Preset {
    problem_type: ProblemType::MathematicalOptimization,
    parameters: &[],
    variables: &["z^{Plant,H}", "u^{Plant,H}", "v^{Plant,H}", "w^{Plant,H}"],
    constraints: &[
        "/sum_i^{Plant} z_{i,h} = d_h /forall_h^{H}",
        "z_{i,h} <= Capacity_i * u_{i,h} /forall_i^{Plant} /forall_h^{H}",
    ],
    objective: (
        "/sum_i^{Plant} /sum_h^{H} (f_i * z_{i,h} + o_i * u_{i,h} + s_i * v_{i,h} + t_i * w_{i,h})",
        SolverDirection::Minimize,
    ),
};

/// Cell tower placement maximising covered population within a budget.
/// Expects tower (`Tower`, `Cost`, `Coverage`) and region
/// (`Region`, `Population`) files.
const CELL_TOWER: Preset = Preset {
    problem_type: ProblemType::LocationAnalysis,
    parameters: &[("budget", "20")],
    variables: &["build_Tower", "iscovered_Region"],
    constraints: &["sum(Cost_t * build_t) <= budget"],
    objective: ("sum(Population_r * iscovered_r)", SolverDirection::Maximize),
};

/// The example problem for a type, if one exists
pub fn preset(problem_type: ProblemType) -> Option<&'static Preset> {
    match problem_type {
        ProblemType::MathematicalOptimization => Some(&POWER_PLANT),
        ProblemType::LocationAnalysis => Some(&CELL_TOWER),
        ProblemType::PortfolioOptimization => None,
    }
}
