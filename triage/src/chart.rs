//! Escalation probability bar chart.
//!
//! Renders the per-response probabilities as a standalone SVG file.
//! Purely presentational — nothing here feeds back into the decision
//! logic, and callers are free to treat a chart failure as non-fatal.

use std::path::Path;

use tracing::info;

use crate::error::{TriageError, TriageResult};
use crate::scorer::EscalationProbabilities;

const CHART_WIDTH: u32 = 640;
const BAR_HEIGHT: u32 = 28;
const BAR_GAP: u32 = 14;
const LABEL_WIDTH: u32 = 240;
const MARGIN: u32 = 24;

/// Render a horizontal bar chart of escalation probabilities to `path`.
///
/// One bar per response type in canonical order, scaled so a probability
/// of 1.0 fills the plot area; each bar is annotated with its value.
pub fn render_bar_chart(probabilities: &EscalationProbabilities, path: &Path) -> TriageResult<()> {
    let svg = bar_chart_svg(probabilities);
    std::fs::write(path, svg).map_err(|source| TriageError::Chart {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Wrote escalation probability chart");
    Ok(())
}

/// Build the SVG document without touching the filesystem.
pub fn bar_chart_svg(probabilities: &EscalationProbabilities) -> String {
    let bar_count = probabilities.iter().count() as u32;
    let height = 2 * MARGIN + bar_count * (BAR_HEIGHT + BAR_GAP) + 20;
    let plot_width = CHART_WIDTH - LABEL_WIDTH - 2 * MARGIN - 60;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CHART_WIDTH}\" height=\"{height}\" \
         font-family=\"sans-serif\" font-size=\"13\">\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{MARGIN}\" y=\"{}\" font-weight=\"bold\">Probability of escalation by company response</text>\n",
        MARGIN - 6
    ));

    for (i, (response, p)) in probabilities.iter().enumerate() {
        let y = MARGIN + 10 + i as u32 * (BAR_HEIGHT + BAR_GAP);
        let bar_width = (p.clamp(0.0, 1.0) * plot_width as f64).round() as u32;
        let bar_x = MARGIN + LABEL_WIDTH;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\">{}</text>\n",
            bar_x - 8,
            y + BAR_HEIGHT / 2 + 4,
            response.label()
        ));
        svg.push_str(&format!(
            "  <rect x=\"{bar_x}\" y=\"{y}\" width=\"{bar_width}\" height=\"{BAR_HEIGHT}\" fill=\"#4878a8\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\">{:.3}</text>\n",
            bar_x + bar_width + 6,
            y + BAR_HEIGHT / 2 + 4,
            p
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
