/// ============================================================
///  Solar project sizing estimates
///
///  Pipeline (single shot, no state):
///   1. Annual production  – P_peak × H × 365 × η_system
///   2. Demand coverage    – production / annual demand, capped at 100 %
///   3. Savings            – covered share of the annual energy bill
///   4. Financials         – ROI and payback (floor of one year)
///   5. Emissions          – grid carbon intensity × MWh produced
/// ============================================================

use crate::models::project::{MonthlyProduction, ProjectInputs, ProjectResult};

// ─── Domain constants ────────────────────────────────────────
/// Panel-to-grid efficiency after system losses.
pub const SYSTEM_EFFICIENCY: f64 = 0.82;
/// Grid carbon intensity, t CO₂ per MWh.
pub const GRID_CO2_T_PER_MWH: f64 = 0.495;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const MIN_PAYBACK_MONTHS: i64 = 12;

/// Seasonal weighting used to spread annual production over Jan..Dec.
pub const MONTHLY_FACTORS: [f64; 12] = [
    0.86, 0.88, 0.94, 1.0, 1.05, 1.08, 1.12, 1.08, 1.02, 0.96, 0.9, 0.84,
];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Nearest integer. Validated inputs keep every value finite and far below `i64::MAX`.
fn round_int(x: f64) -> i64 {
    x.round() as i64
}

fn round_2dp(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Main entry point – `ProjectInputs → ProjectResult`.
///
/// Pure and deterministic. Degenerate inputs never yield NaN or infinity:
/// * zero demand   → coverage 100 % if anything is produced, else 0 %
/// * `investment <= 0` → ROI 0 % (the HTTP boundary rejects it beforehand)
/// * zero savings  → payback computed against a savings floor of 1
pub fn estimate(inputs: &ProjectInputs) -> ProjectResult {
    // ── 1. Production ──────────────────────────────────────────
    let production = round_int(
        inputs.peak_power_kw * inputs.irradiance * DAYS_PER_YEAR * SYSTEM_EFFICIENCY,
    );

    // ── 2. Coverage ────────────────────────────────────────────
    let demand = inputs.daily_consumption_kwh * DAYS_PER_YEAR;
    let coverage_rate = if demand > 0.0 {
        round_int(production as f64 / demand * 100.0).clamp(0, 100)
    } else if production > 0 {
        100
    } else {
        0
    };

    // ── 3. Savings ─────────────────────────────────────────────
    let savings = round_int(
        inputs.daily_consumption_kwh
            * inputs.tariff
            * DAYS_PER_YEAR
            * (coverage_rate as f64 / 100.0),
    );

    // ── 4. Financials ──────────────────────────────────────────
    let roi = if inputs.investment > 0.0 {
        round_int(savings as f64 / inputs.investment * 100.0)
    } else {
        0
    };
    let payback_months =
        round_int(inputs.investment / savings.max(1) as f64 * 12.0).max(MIN_PAYBACK_MONTHS);

    // ── 5. Emissions ───────────────────────────────────────────
    let co2_offset = round_2dp(production as f64 / 1000.0 * GRID_CO2_T_PER_MWH);

    ProjectResult {
        production,
        coverage_rate,
        savings,
        roi,
        payback_months,
        co2_offset,
    }
}

/// Spreads annual production over the calendar year with [`MONTHLY_FACTORS`].
pub fn monthly_breakdown(production: i64) -> Vec<MonthlyProduction> {
    let weight: f64 = MONTHLY_FACTORS.iter().sum();
    let base = production as f64 / weight;
    MONTH_NAMES
        .iter()
        .zip(MONTHLY_FACTORS)
        .map(|(month, factor)| MonthlyProduction {
            month: month.to_string(),
            production: round_int(base * factor),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::fixtures::sample_inputs;

    #[test]
    fn default_wizard_inputs() {
        let result = estimate(&sample_inputs());
        // 50 kWp × 4.5 × 365 × 0.82 = 67 342.5
        assert_eq!(result.production, 67_343);
        assert_eq!(result.coverage_rate, 74);
        assert_eq!(result.savings, 10_804);
        assert_eq!(result.roi, 14);
        assert_eq!(result.payback_months, 89);
        assert_eq!(result.co2_offset, 33.33);
    }

    #[test]
    fn estimate_is_idempotent() {
        let inputs = sample_inputs();
        let first = serde_json::to_string(&estimate(&inputs)).unwrap();
        let second = serde_json::to_string(&estimate(&inputs)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn coverage_is_capped_at_100() {
        let mut inputs = sample_inputs();
        inputs.peak_power_kw = 500.0;
        let result = estimate(&inputs);
        assert_eq!(result.coverage_rate, 100);
        // savings follow the capped coverage: 250 × 0.16 × 365
        assert_eq!(result.savings, 14_600);
    }

    #[test]
    fn coverage_stays_in_range_across_sizes() {
        let mut inputs = sample_inputs();
        for kw in [0.5, 1.0, 10.0, 42.0, 80.0, 300.0, 5_000.0] {
            inputs.peak_power_kw = kw;
            for consumption in [1.0, 12.5, 250.0, 4_000.0] {
                inputs.daily_consumption_kwh = consumption;
                let result = estimate(&inputs);
                assert!((0..=100).contains(&result.coverage_rate), "{kw} kWp / {consumption} kWh");
                assert!(result.payback_months >= MIN_PAYBACK_MONTHS);
            }
        }
    }

    #[test]
    fn payback_never_below_one_year() {
        let mut inputs = sample_inputs();
        inputs.investment = 100.0;
        let result = estimate(&inputs);
        assert_eq!(result.payback_months, 12);
    }

    #[test]
    fn zero_consumption_keeps_outputs_finite() {
        let mut inputs = sample_inputs();
        inputs.daily_consumption_kwh = 0.0;
        let result = estimate(&inputs);
        assert_eq!(result.coverage_rate, 100);
        assert_eq!(result.savings, 0);
        assert_eq!(result.roi, 0);
        assert_eq!(result.payback_months, 80_000 * 12);
        assert!(result.co2_offset.is_finite());
    }

    #[test]
    fn nothing_produced_nothing_demanded() {
        let mut inputs = sample_inputs();
        inputs.daily_consumption_kwh = 0.0;
        inputs.peak_power_kw = 0.0;
        let result = estimate(&inputs);
        assert_eq!(result.production, 0);
        assert_eq!(result.coverage_rate, 0);
        assert_eq!(result.co2_offset, 0.0);
    }

    #[test]
    fn zero_investment_yields_zero_roi() {
        let mut inputs = sample_inputs();
        inputs.investment = 0.0;
        let result = estimate(&inputs);
        assert_eq!(result.roi, 0);
        assert_eq!(result.payback_months, 12);
    }

    #[test]
    fn largest_accepted_inputs_stay_in_range() {
        use crate::models::project::{
            MAX_DAILY_CONSUMPTION_KWH, MAX_INVESTMENT, MAX_IRRADIANCE, MAX_PEAK_POWER_KW,
            MAX_STORAGE_KWH, MAX_TARIFF, MIN_INVESTMENT,
        };

        let mut inputs = sample_inputs();
        inputs.peak_power_kw = MAX_PEAK_POWER_KW;
        inputs.irradiance = MAX_IRRADIANCE;
        inputs.daily_consumption_kwh = MAX_DAILY_CONSUMPTION_KWH;
        inputs.storage_capacity_kwh = MAX_STORAGE_KWH;
        inputs.tariff = MAX_TARIFF;
        inputs.investment = MIN_INVESTMENT;
        assert!(inputs.validate().is_ok());

        let result = estimate(&inputs);
        assert_eq!(result.production, 7_183_200_000_000);
        assert_eq!(result.coverage_rate, 100);
        assert_eq!(result.savings, 365_000_000_000_000);
        assert_eq!(result.roi, 36_500_000_000_000_000);
        assert!(result.roi < i64::MAX);

        inputs.investment = MAX_INVESTMENT;
        inputs.tariff = 1e-9;
        assert!(inputs.validate().is_ok());
        let result = estimate(&inputs);
        assert!(result.payback_months > 0 && result.payback_months < i64::MAX);
    }

    #[test]
    fn seeded_lyon_site() {
        let inputs = crate::services::project_store::seed_projects()[0].inputs.clone();
        let result = estimate(&inputs);
        // 120 × 4.2 × 365 × 0.82 = 150 847.2
        assert_eq!(result.production, 150_847);
        assert_eq!(result.coverage_rate, 61);
        assert_eq!(result.co2_offset, 74.67);
    }

    #[test]
    fn monthly_breakdown_follows_seasonal_factors() {
        let months = monthly_breakdown(67_343);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, "Jan");
        assert_eq!(months[6].month, "Jul");
        let july = months[6].production;
        assert!(months.iter().all(|m| m.production <= july));
        let total: i64 = months.iter().map(|m| m.production).sum();
        assert!((total - 67_343).abs() <= 6, "total {total}");
    }

    #[test]
    fn monthly_breakdown_of_nothing_is_zero() {
        assert!(monthly_breakdown(0).iter().all(|m| m.production == 0));
    }
}
