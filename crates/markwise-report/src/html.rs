//! HTML scorecard generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use markwise_core::report::GradeReport;
use markwise_core::session::format_elapsed;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML scorecard from a grade report.
pub fn generate_html(report: &GradeReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>markwise scorecard — {}</title>\n",
        html_escape(&report.question_set.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>markwise scorecard</h1>\n");
    let student = report
        .student
        .as_deref()
        .map(html_escape)
        .unwrap_or_else(|| "—".to_string());
    html.push_str(&format!(
        "<p class=\"meta\">Question set: <strong>{}</strong> | Student: <strong>{}</strong> | {} questions | {}</p>\n",
        html_escape(&report.question_set.title),
        student,
        report.question_set.question_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");

    let elapsed = report
        .elapsed_secs
        .map(format_elapsed)
        .unwrap_or_else(|| "—".to_string());
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Percent</th><th>Weak Concepts</th><th>Time Logged</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{} / {}</td><td>{:.1}%</td><td>{}</td><td>{}</td></tr></tbody>\n",
        report.score,
        report.total_marks,
        report.percent(),
        report.weak_concepts.len(),
        elapsed,
    ));
    html.push_str("</table>\n");

    // SVG bar chart of per-question credit fractions
    if !report.outcomes.is_empty() {
        html.push_str(&generate_bar_chart(report));
    }

    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Question</th><th onclick=\"sortTable(1)\">Concept</th><th onclick=\"sortTable(2)\">Result</th><th onclick=\"sortTable(3)\">Credit</th><th onclick=\"sortTable(4)\">Graded</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for o in &report.outcomes {
        let result_class = if o.correct { "pass" } else { "fail" };
        let result_text = if o.correct { "OK" } else { "MISS" };
        let graded_text = if o.auto_graded { "auto" } else { "manual review" };

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}/{}</td><td>{}</td></tr>\n",
            result_class,
            html_escape(&o.question_id),
            html_escape(&o.concept),
            result_class,
            result_text,
            o.credit_awarded,
            o.marks,
            graded_text,
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Knowledge gap panel
    html.push_str("<section class=\"gaps\">\n");
    html.push_str("<h2>Knowledge Gap Analysis</h2>\n");
    if report.weak_concepts.is_empty() {
        html.push_str("<p class=\"mastered\">Concept-level mastery is consistent across all tested categories.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for concept in &report.weak_concepts {
            html.push_str(&format!(
                "<li><span class=\"weak\">{}</span></li>\n",
                html_escape(concept)
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML scorecard to a file.
pub fn write_html_report(report: &GradeReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(report: &GradeReport) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let rows: Vec<(&str, f64)> = report
        .outcomes
        .iter()
        .map(|o| {
            let fraction = if o.marks == 0 {
                0.0
            } else {
                o.credit_awarded as f64 / o.marks as f64
            };
            (o.question_id.as_str(), fraction)
        })
        .collect();

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (question_id, fraction)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (*fraction * max_width as f64) as usize;

        let color = if *fraction >= 0.8 {
            "#22c55e"
        } else if *fraction >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(question_id)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.0}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            fraction * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.weak { font-weight: bold; color: #ef4444; }
.mastered { color: #22c55e; font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
