use crate::models::project::{ChartPoint, DashboardSummary, Project};

/// Projects plotted on the dashboard chart.
pub const CHART_LEN: usize = 6;
/// Projects listed under "latest calculation notes".
pub const RECENT_LEN: usize = 3;

/// First two words of the project name, used as chart label.
fn short_label(name: &str) -> String {
    name.split(' ').take(2).collect::<Vec<_>>().join(" ")
}

/// Portfolio totals over the whole collection (in list order).
///
/// The average ROI is taken over the charted projects only, like the chart
/// it sits next to.
pub fn summarize(projects: &[Project]) -> DashboardSummary {
    // Stored blobs may predate input bounds, so totals saturate instead of overflowing.
    let total_production = projects.iter().map(|p| p.result.production).fold(0, i64::saturating_add);
    let total_savings = projects.iter().map(|p| p.result.savings).fold(0, i64::saturating_add);
    let total_co2: f64 = projects.iter().map(|p| p.result.co2_offset).sum();

    let chart: Vec<ChartPoint> = projects
        .iter()
        .take(CHART_LEN)
        .map(|p| ChartPoint {
            name: short_label(&p.inputs.name),
            production: p.result.production,
            roi: p.result.roi,
        })
        .collect();

    let average_roi = if chart.is_empty() {
        0
    } else {
        let sum = chart.iter().map(|c| c.roi).fold(0, i64::saturating_add);
        (sum as f64 / chart.len() as f64).round() as i64
    };

    DashboardSummary {
        project_count: projects.len(),
        total_production,
        total_savings,
        total_co2_offset: (total_co2 * 100.0).round() / 100.0,
        average_roi,
        chart,
        recent: projects.iter().take(RECENT_LEN).cloned().collect(),
    }
}
