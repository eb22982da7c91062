use crate::cli::Scenario;
use scout_common::{OutputFormat, ScoutConfig};
use scout_table::Constituent;
use serde::Serialize;
use std::fmt::Write;

/// The outcome of one scenario, ready to print.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub scenario: &'static str,
    pub title: String,
    #[serde(skip)]
    kind: Scenario,
    pub constituents: Vec<Constituent>,
}

impl ScenarioReport {
    pub fn new(kind: Scenario, cfg: &ScoutConfig, constituents: Vec<Constituent>) -> Self {
        let s = &cfg.scenarios;
        let title = match kind {
            Scenario::Top => format!("Top {} constituents by highest % change", s.top_n),
            Scenario::Bottom => format!("Bottom {} constituents by lowest % change", s.bottom_n),
            Scenario::Threshold => format!(
                "Constituents with market cap above {} million, first {} pages",
                s.threshold_millions, s.page_bound
            ),
        };
        Self {
            scenario: kind.key(),
            title,
            kind,
            constituents,
        }
    }
}

pub fn render(reports: &[ScenarioReport], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)? + "\n"),
        OutputFormat::Table => Ok(render_text(reports)),
    }
}

fn render_text(reports: &[ScenarioReport]) -> String {
    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}:", report.title);
        if report.constituents.is_empty() {
            out.push_str("  (none)\n");
            continue;
        }
        match report.kind {
            Scenario::Top | Scenario::Bottom => write_names(&mut out, &report.constituents),
            Scenario::Threshold => write_market_caps(&mut out, &report.constituents),
        }
    }
    out
}

fn write_names(out: &mut String, rows: &[Constituent]) {
    let width = rows.len().to_string().len();
    for (i, c) in rows.iter().enumerate() {
        let _ = writeln!(out, "  {:>width$}. {}", i + 1, c.name());
    }
}

fn write_market_caps(out: &mut String, rows: &[Constituent]) {
    const HEADERS: [&str; 3] = ["Name", "Market Cap (Text)", "Market Cap (M)"];

    let cells: Vec<[String; 3]> = rows
        .iter()
        .map(|c| {
            [
                c.name().to_string(),
                c.market_cap_text().unwrap_or("-").to_string(),
                c.market_cap_in_millions()
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let _ = writeln!(
        out,
        "  {:<w0$}  {:>w1$}  {:>w2$}",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    );
    let _ = writeln!(
        out,
        "  {}  {}  {}",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2])
    );
    for [name, text, millions] in &cells {
        let _ = writeln!(
            out,
            "  {:<w0$}  {:>w1$}  {:>w2$}",
            name,
            text,
            millions,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        );
    }
}
