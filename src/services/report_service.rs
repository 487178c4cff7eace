//! Document and spreadsheet projections of a stored project.
//!
//! The document is a plain-text calculation note; the spreadsheet is the flat
//! key/value view of the same project written as two-column CSV.

use crate::models::project::Project;

pub const DEFAULT_FILE_STEM: &str = "note-de-calcul";

/// `"Centre logistique Lyon"` → `"centre-logistique-lyon"`.
pub fn file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c);
        } else if !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem.to_string()
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() { "Not specified" } else { value }
}

pub fn render_document(project: &Project) -> String {
    let i = &project.inputs;
    let r = &project.result;
    format!(
        "SOLAR SIZING REPORT\n\
         ===================\n\
         \n\
         Project        : {name}\n\
         Client         : {client}\n\
         Location       : {location}\n\
         Mode           : {mode}\n\
         Created        : {created}\n\
         \n\
         Inputs\n\
         ------\n\
         Peak power     : {peak} kWp\n\
         Consumption    : {consumption} kWh/day\n\
         Irradiance     : {irradiance} kWh/m²/day\n\
         Storage        : {storage} kWh\n\
         Investment     : {investment}\n\
         Tariff         : {tariff} /kWh\n\
         Horizon        : {horizon} years\n\
         \n\
         Results\n\
         -------\n\
         Production     : {production} kWh/year\n\
         Coverage       : {coverage}%\n\
         ROI            : {roi}%\n\
         Savings        : {savings} /year\n\
         Payback        : {payback} years\n\
         CO2 avoided    : {co2} t/year\n",
        name = or_unset(&i.name),
        client = or_unset(&i.client),
        location = or_unset(&i.location),
        mode = i.mode,
        created = project.created_at.format("%Y-%m-%d"),
        peak = i.peak_power_kw,
        consumption = i.daily_consumption_kwh,
        irradiance = i.irradiance,
        storage = i.storage_capacity_kwh,
        investment = i.investment,
        tariff = i.tariff,
        horizon = i.horizon_years,
        production = group_thousands(r.production),
        coverage = r.coverage_rate,
        roi = r.roi,
        savings = group_thousands(r.savings),
        payback = r.payback_years(),
        co2 = r.co2_offset,
    )
}

/// Flat key/value projection, one row per field.
pub fn sheet_rows(project: &Project) -> Vec<(&'static str, String)> {
    let i = &project.inputs;
    let r = &project.result;
    vec![
        ("Project name", i.name.clone()),
        ("Client", i.client.clone()),
        ("Location", i.location.clone()),
        ("Mode", i.mode.to_string()),
        ("Peak power (kWp)", i.peak_power_kw.to_string()),
        ("Daily consumption (kWh)", i.daily_consumption_kwh.to_string()),
        ("Irradiance (kWh/m²/day)", i.irradiance.to_string()),
        ("Storage (kWh)", i.storage_capacity_kwh.to_string()),
        ("Investment", i.investment.to_string()),
        ("Tariff (/kWh)", i.tariff.to_string()),
        ("Horizon (years)", i.horizon_years.to_string()),
        ("Annual production (kWh)", r.production.to_string()),
        ("Coverage (%)", r.coverage_rate.to_string()),
        ("ROI (%)", r.roi.to_string()),
        ("Savings", r.savings.to_string()),
        ("Payback (months)", r.payback_months.to_string()),
        ("CO2 avoided (t/year)", r.co2_offset.to_string()),
    ]
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_sheet(project: &Project) -> String {
    let mut out = String::from("key,value\r\n");
    for (key, value) in sheet_rows(project) {
        out.push_str(&csv_field(key));
        out.push(',');
        out.push_str(&csv_field(&value));
        out.push_str("\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::project_store::seed_projects;

    #[test]
    fn stems_are_slugified() {
        assert_eq!(file_stem("Centre logistique Lyon"), "centre-logistique-lyon");
        assert_eq!(file_stem("  Ferme #2 / Sénégal "), "ferme-2-s-n-gal");
        assert_eq!(file_stem(""), DEFAULT_FILE_STEM);
        assert_eq!(file_stem("***"), DEFAULT_FILE_STEM);
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(67_343), "67,343");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-4_200), "-4,200");
    }

    #[test]
    fn document_lists_headline_figures() {
        let projects = seed_projects();
        let project = &projects[0];
        let doc = render_document(project);
        assert!(doc.contains("Project        : Centre logistique Lyon"));
        assert!(doc.contains("Mode           : on-grid"));
        assert!(doc.contains("Production     : 150,847 kWh/year"));
        assert!(doc.contains(&format!("Payback        : {} years", project.result.payback_years())));
    }

    #[test]
    fn document_sections_are_laid_out_in_order() {
        let projects = seed_projects();
        let doc = render_document(&projects[0]);
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines.len(), 26);
        assert_eq!(lines[..3], ["SOLAR SIZING REPORT", "===================", ""]);
        assert_eq!(lines[8..11], ["", "Inputs", "------"]);
        assert_eq!(lines[18..21], ["", "Results", "-------"]);
        assert!(lines[25].starts_with("CO2 avoided    : "));
        assert!(doc.ends_with(" t/year\n"));
        assert!(lines.iter().all(|line| !line.starts_with(' ')));
    }

    #[test]
    fn blank_labels_render_as_not_specified() {
        let mut project = seed_projects().remove(1);
        project.inputs.client = String::new();
        assert!(render_document(&project).contains("Client         : Not specified"));
    }

    #[test]
    fn sheet_quotes_fields_with_commas() {
        let projects = seed_projects();
        let project = &projects[1];
        let sheet = render_sheet(project);
        assert_eq!(sheet.lines().next(), Some("key,value"));
        assert!(sheet.contains("Location,\"Saint-Louis, Sénégal\"\r\n"));
        assert!(sheet.contains("Mode,pumping\r\n"));
        assert_eq!(sheet.lines().count(), sheet_rows(project).len() + 1);
    }
}
