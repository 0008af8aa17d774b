use std::fmt::Write;

use crate::views::layout::{page, Tab};

const CARDS: [(&str, &str, &str); 3] = [
    (
        "/problem",
        "Define a problem",
        "Pick a problem type, upload your data files and describe the model.",
    ),
    (
        "/dashboard",
        "View results",
        "See the report and charts of the last problem you ran.",
    ),
    (
        "/faq",
        "FAQ",
        "How the problem types, files and formulas fit together.",
    ),
];

pub fn render() -> String {
    let mut body = String::from(
        "<h1>MILP Workbench</h1>\n\
         <p>Describe a mixed integer linear program, send it to the solver and explore the result.</p>\n\
         <div class=\"grid\">\n",
    );
    for (href, title, text) in CARDS {
        let _ = writeln!(
            body,
            "<a class=\"card\" href=\"{}\"><h3>{}</h3><p>{}</p></a>",
            href, title, text
        );
    }
    body.push_str("</div>");
    page(Tab::Home, &body)
}
