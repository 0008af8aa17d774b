use std::fmt::Write;

pub const APP_TITLE: &str = "MILP Workbench";

/// Top-level views reachable from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Dashboard,
    Problem,
    Faq,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Dashboard, Tab::Problem, Tab::Faq];

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Dashboard => "Dashboard",
            Tab::Problem => "Problem",
            Tab::Faq => "FAQ",
        }
    }

    pub fn href(&self) -> &'static str {
        match self {
            Tab::Home => "/",
            Tab::Dashboard => "/dashboard",
            Tab::Problem => "/problem",
            Tab::Faq => "/faq",
        }
    }
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #1b1f24; }
nav { display: flex; gap: 0.25rem; padding: 0.5rem 1rem; background: #1b1f24; }
nav a { color: #c9d1d9; text-decoration: none; padding: 0.4rem 0.8rem; border-radius: 4px; }
nav a.active { background: #3b82f6; color: #fff; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1rem; }
.card, .chart, .question, fieldset { background: #fff; border: 1px solid #d0d7de; border-radius: 6px; padding: 1rem; }
.card { text-decoration: none; color: inherit; }
.chart { margin-bottom: 1rem; overflow-x: auto; }
.chart img { max-width: 100%; }
.error { background: #fdecea; border: 1px solid #f5c2c0; padding: 0.75rem; border-radius: 6px; }
.busy { background: #fff8e1; border: 1px solid #f3d27a; padding: 0.75rem; border-radius: 6px; }
fieldset { margin-bottom: 1rem; }
.row { display: flex; gap: 0.5rem; margin-bottom: 0.4rem; }
.row input[type=text] { flex: 1; }
table { border-collapse: collapse; }
th, td { border: 1px solid #d0d7de; padding: 0.3rem 0.6rem; text-align: left; }
"#;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn navbar(active: Tab) -> String {
    let mut html = String::from("<nav>");
    for tab in Tab::ALL {
        let class = if tab == active { " class=\"active\"" } else { "" };
        let _ = write!(html, "<a href=\"{}\"{}>{}</a>", tab.href(), class, tab.name());
    }
    html.push_str("</nav>");
    html
}

/// Full HTML document with the navigation bar on top
pub fn page(active: Tab, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | {tab}</title>\n<style>{style}</style>\n</head>\n<body>\n{nav}\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n",
        title = APP_TITLE,
        tab = active.name(),
        style = STYLE,
        nav = navbar(active),
        body = body,
    )
}
