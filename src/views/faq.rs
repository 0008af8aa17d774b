use std::fmt::Write;

use crate::views::layout::{escape, page, Tab};

const QUESTIONS: &[(&str, &str)] = &[
    (
        "Which problem types are supported?",
        "Portfolio Optimization, Mathematical Optimization and Location Analysis. \
         Each type only shows the sections it needs.",
    ),
    (
        "What goes into the files section?",
        "CSV data files the model refers to, for example plant capacities and hourly demand. \
         Selecting new files replaces the previous selection; Clear files empties it.",
    ),
    (
        "How do I write variables?",
        "One variable per row with its index sets in braces, for example z^{Plant,H}.",
    ),
    (
        "How do I write constraints and objectives?",
        "As formulas over the variables and parameters, for example \
         /sum_i^{Plant} z_{i,h} = d_h /forall_h^{H}. \
         Choose whether the objective is minimized or maximized.",
    ),
    (
        "What are parameters?",
        "Named scalar values such as a budget. Rows with a blank name or value are not sent.",
    ),
    (
        "Where do I see the result?",
        "After a successful run you are taken to the Dashboard, which keeps the last result \
         of your session. A text report, a table and one or more charts can be shown.",
    ),
    (
        "Can I start from an example?",
        "Yes. The Mathematical Optimization and Location Analysis types have example \
         problems that fill in the form.",
    ),
];

pub fn render() -> String {
    let mut body = String::from("<h1>Frequently asked questions</h1>\n");
    for (question, answer) in QUESTIONS {
        let _ = writeln!(
            body,
            "<div class=\"question\"><h3>{}</h3><p>{}</p></div>",
            escape(question),
            escape(answer)
        );
    }
    page(Tab::Faq, &body)
}
