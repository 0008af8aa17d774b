use milp_api_sdk::{Figures, Record, Report, Solution};
use serde_json::Value;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// What the dashboard shows for one stored solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dashboard {
    /// Nothing has been run yet
    Empty,
    Populated {
        report: Option<ReportView>,
        figures: Vec<FigureView>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportView {
    Lines {
        heading: Option<String>,
        rows: Vec<String>,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureView {
    pub heading: String,
    pub src: String,
}

impl Dashboard {
    pub fn from_solution(solution: Option<&Solution>) -> Self {
        let Some(solution) = solution else {
            return Dashboard::Empty;
        };

        Dashboard::Populated {
            report: solution.result.as_ref().and_then(report_view),
            figures: solution.fig.as_ref().map(figure_views).unwrap_or_default(),
        }
    }
}

fn report_view(report: &Report) -> Option<ReportView> {
    match report {
        Report::Text(text) => Some(text_report(text)),
        Report::Table(records) => table_report(records),
        Report::Unrecognized(_) => None,
    }
}

fn text_report(text: &str) -> ReportView {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.len() > 2 && lines.last() == Some(&"") {
        lines.pop();
    }

    ReportView::Lines {
        heading: lines.get(1).map(|line| line.to_string()),
        rows: lines.iter().skip(2).map(|line| line.to_string()).collect(),
    }
}

fn table_report(records: &[Record]) -> Option<ReportView> {
    let first = records.first()?;
    let header: Vec<String> = first.keys().cloned().collect();
    let rows = records
        .iter()
        .map(|record| {
            header
                .iter()
                .map(|key| record.get(key).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    Some(ReportView::Table { header, rows })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn figure_views(figures: &Figures) -> Vec<FigureView> {
    let images: Vec<&String> = match figures {
        Figures::Single(image) => vec![image],
        Figures::Many(images) => images.iter().collect(),
        Figures::Unrecognized(_) => Vec::new(),
    };
    let images: Vec<&String> = images.into_iter().filter(|i| !i.trim().is_empty()).collect();

    let numbered = images.len() > 1;
    images
        .into_iter()
        .enumerate()
        .map(|(index, image)| FigureView {
            heading: if numbered {
                format!("Visualization {}", index + 1)
            } else {
                "Visualization".to_string()
            },
            src: data_url(image),
        })
        .collect()
}

fn data_url(image: &str) -> String {
    let image = image.trim();
    if image.starts_with("data:") {
        image.to_string()
    } else {
        format!("{}{}", PNG_DATA_URL_PREFIX, image)
    }
}
