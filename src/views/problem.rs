use std::fmt::Write;

use milp_api_sdk::SolverDirection;

use crate::controller::FormAction;
use crate::domain::form::ProblemForm;
use crate::domain::presets::preset;
use crate::domain::problem_type::{FieldGroup, FieldGroupMap, ProblemType};
use crate::models::{
    ACTION, CONSTRAINT, FILE, OBJECTIVE_FORMULA, OBJECTIVE_SENSE, PARAMETER_KEY, PARAMETER_VALUE,
    PROBLEM_TYPE, VARIABLE,
};
use crate::views::layout::{escape, page, Tab};

pub fn render(form: &ProblemForm, groups: &FieldGroupMap) -> String {
    let mut body = String::from("<h1>Define a problem</h1>\n");

    if let Some(message) = form.error() {
        let _ = writeln!(body, "<div class=\"error\" role=\"alert\">{}</div>", escape(message));
    }
    if form.is_submitting() {
        body.push_str("<div class=\"busy\" role=\"status\">Solving the problem&hellip;</div>\n");
    }

    body.push_str("<form method=\"post\" action=\"/problem\" enctype=\"multipart/form-data\">\n");
    // First submit button in the form, so Enter keeps the edits instead of adding rows
    let _ = writeln!(
        body,
        "<button type=\"submit\" name=\"{}\" value=\"{}\" style=\"position:absolute;left:-9999px\" tabindex=\"-1\" aria-hidden=\"true\">Save</button>",
        ACTION,
        FormAction::Save.value()
    );

    body.push_str(&type_section(form.problem_type()));

    if let Some(problem_type) = form.problem_type() {
        for group in groups.groups(problem_type) {
            let section = match group {
                FieldGroup::Files => files_section(form),
                FieldGroup::Parameters => parameters_section(form),
                FieldGroup::Variables => text_section(
                    FieldGroup::Variables,
                    "Variables",
                    VARIABLE,
                    "x^{I}",
                    form.variables().rows().iter().map(|row| row.value.as_str()),
                ),
                FieldGroup::Objective => objective_section(form),
                FieldGroup::Constraints => text_section(
                    FieldGroup::Constraints,
                    "Constraints",
                    CONSTRAINT,
                    "x_i <= 1 /forall_i^{I}",
                    form.constraints().rows().iter().map(|row| row.value.as_str()),
                ),
            };
            body.push_str(&section);
        }
    }

    let disabled = if form.is_submitting() { " disabled" } else { "" };
    let _ = writeln!(
        body,
        "<button type=\"submit\" name=\"{}\" value=\"{}\"{}>Run problem</button>",
        ACTION,
        FormAction::Submit.value(),
        disabled
    );
    body.push_str("</form>");

    page(Tab::Problem, &body)
}

fn type_section(selected: Option<ProblemType>) -> String {
    let mut html = String::from("<fieldset>\n<legend>Problem type</legend>\n");
    let _ = write!(html, "<select name=\"{}\">", PROBLEM_TYPE);
    let placeholder = if selected.is_none() { " selected" } else { "" };
    let _ = write!(html, "<option value=\"\"{}>Select problem type</option>", placeholder);
    for problem_type in ProblemType::ALL {
        let mark = if selected == Some(problem_type) { " selected" } else { "" };
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            problem_type.as_str(),
            mark,
            problem_type.label()
        );
    }
    html.push_str("</select>\n");
    let _ = writeln!(
        html,
        "<button type=\"submit\" name=\"{}\" value=\"{}\">Apply</button>",
        ACTION,
        FormAction::SelectType.value()
    );

    for problem_type in ProblemType::ALL {
        if preset(problem_type).is_some() {
            let _ = writeln!(
                html,
                "<button type=\"submit\" name=\"{}\" value=\"{}\">Load {} example</button>",
                ACTION,
                FormAction::Preset(problem_type).value(),
                problem_type.label()
            );
        }
    }
    html.push_str("</fieldset>\n");
    html
}

fn files_section(form: &ProblemForm) -> String {
    let mut html = String::from("<fieldset>\n<legend>Files</legend>\n");
    let _ = writeln!(html, "<input type=\"file\" name=\"{}\" multiple>", FILE);
    if !form.files().is_empty() {
        html.push_str("<ul class=\"files\">");
        for file in form.files() {
            let _ = write!(
                html,
                "<li>{} ({} bytes)</li>",
                escape(&file.file_name),
                file.bytes.len()
            );
        }
        html.push_str("</ul>\n");
        let _ = writeln!(
            html,
            "<button type=\"submit\" name=\"{}\" value=\"{}\">Clear files</button>",
            ACTION,
            FormAction::ClearFiles.value()
        );
    }
    html.push_str("</fieldset>\n");
    html
}

fn parameters_section(form: &ProblemForm) -> String {
    let mut html = String::from("<fieldset>\n<legend>Parameters</legend>\n");
    for (index, row) in form.parameters().rows().iter().enumerate() {
        let _ = writeln!(
            html,
            "<div class=\"row\"><input type=\"text\" name=\"{}\" placeholder=\"name\" value=\"{}\">\
             <input type=\"text\" name=\"{}\" placeholder=\"value\" value=\"{}\">{}</div>",
            PARAMETER_KEY,
            escape(&row.key),
            PARAMETER_VALUE,
            escape(&row.value),
            remove_button(FieldGroup::Parameters, index)
        );
    }
    html.push_str(&add_button(FieldGroup::Parameters, "Add parameter"));
    html.push_str("</fieldset>\n");
    html
}

fn text_section<'a>(
    group: FieldGroup,
    legend: &str,
    field: &str,
    placeholder: &str,
    values: impl Iterator<Item = &'a str>,
) -> String {
    let mut html = format!("<fieldset>\n<legend>{}</legend>\n", legend);
    for (index, value) in values.enumerate() {
        let _ = writeln!(
            html,
            "<div class=\"row\"><input type=\"text\" name=\"{}\" placeholder=\"{}\" value=\"{}\">{}</div>",
            field,
            escape(placeholder),
            escape(value),
            remove_button(group, index)
        );
    }
    html.push_str(&add_button(group, &format!("Add {}", legend.to_lowercase().trim_end_matches('s'))));
    html.push_str("</fieldset>\n");
    html
}

fn objective_section(form: &ProblemForm) -> String {
    let objective = form.objective();
    let mut html = String::from("<fieldset>\n<legend>Objective</legend>\n");
    let _ = writeln!(
        html,
        "<div class=\"row\"><input type=\"text\" name=\"{}\" placeholder=\"sum_i c_i * x_i\" value=\"{}\"></div>",
        OBJECTIVE_FORMULA,
        escape(&objective.formula)
    );
    let _ = write!(html, "<select name=\"{}\">", OBJECTIVE_SENSE);
    let unset = if objective.sense.is_none() { " selected" } else { "" };
    let _ = write!(html, "<option value=\"\"{}>Minimize or maximize?</option>", unset);
    for (sense, label) in [
        (SolverDirection::Minimize, "Minimize"),
        (SolverDirection::Maximize, "Maximize"),
    ] {
        let mark = if objective.sense == Some(sense) { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{}\"{}>{}</option>", sense.as_str(), mark, label);
    }
    html.push_str("</select>\n</fieldset>\n");
    html
}

fn remove_button(group: FieldGroup, index: usize) -> String {
    format!(
        "<button type=\"submit\" name=\"{}\" value=\"{}\" aria-label=\"Remove row\">X</button>",
        ACTION,
        FormAction::Remove(group, index).value()
    )
}

fn add_button(group: FieldGroup, label: &str) -> String {
    format!(
        "<button type=\"submit\" name=\"{}\" value=\"{}\">{}</button>\n",
        ACTION,
        FormAction::Add(group).value(),
        label
    )
}
