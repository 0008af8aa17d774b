use std::fmt::Write;

use crate::domain::dashboard::{Dashboard, FigureView, ReportView};
use crate::views::layout::{escape, page, Tab};

pub fn render(dashboard: &Dashboard) -> String {
    let body = match dashboard {
        Dashboard::Empty => "<a href=\"/problem\">Define a problem</a>".to_string(),
        Dashboard::Populated { report, figures } => {
            let mut html = String::from("<div class=\"grid-stack\">\n");
            if let Some(report) = report {
                html.push_str(&render_report(report));
            }
            for figure in figures {
                html.push_str(&render_figure(figure));
            }
            html.push_str("</div>");
            html
        }
    };
    page(Tab::Dashboard, &body)
}

fn render_report(report: &ReportView) -> String {
    let mut html = String::from("<div class=\"chart\">\n");
    match report {
        ReportView::Lines { heading, rows } => {
            if let Some(heading) = heading {
                let _ = writeln!(html, "<h2>{}</h2>", escape(heading));
            }
            for row in rows {
                let _ = writeln!(html, "<p>{}</p>", escape(row));
            }
        }
        ReportView::Table { header, rows } => {
            html.push_str("<table>\n<thead><tr>");
            for key in header {
                let _ = write!(html, "<th>{}</th>", escape(key));
            }
            html.push_str("</tr></thead>\n<tbody>\n");
            for row in rows {
                html.push_str("<tr>");
                for cell in row {
                    let _ = write!(html, "<td>{}</td>", escape(cell));
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</tbody>\n</table>\n");
        }
    }
    html.push_str("</div>\n");
    html
}

fn render_figure(figure: &FigureView) -> String {
    format!(
        "<div class=\"chart\">\n<h2>{heading}</h2>\n<img class=\"figure\" alt=\"{heading}\" src=\"{src}\">\n</div>\n",
        heading = escape(&figure.heading),
        src = escape(&figure.src),
    )
}
