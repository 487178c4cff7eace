use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::InputError;

// ─── Sizing scenario ─────────────────────────────────────────────────────────

/// Sizing scenario. Closed set: anything else is rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationMode {
    /// Grid-connected installation
    OnGrid,
    /// Autonomous installation with storage
    OffGrid,
    /// Solar-powered water pumping
    Pumping,
}

impl CalculationMode {
    pub const ALL: [CalculationMode; 3] = [Self::OnGrid, Self::OffGrid, Self::Pumping];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnGrid => "on-grid",
            Self::OffGrid => "off-grid",
            Self::Pumping => "pumping",
        }
    }
}

impl fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| InputError::UnknownMode(s.to_string()))
    }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

pub const MAX_PEAK_POWER_KW: f64 = 1e9;
pub const MAX_DAILY_CONSUMPTION_KWH: f64 = 1e9;
/// Peak sun hours per day cannot exceed the hours in a day.
pub const MAX_IRRADIANCE: f64 = 24.0;
pub const MAX_STORAGE_KWH: f64 = 1e9;
pub const MIN_INVESTMENT: f64 = 1.0;
pub const MAX_INVESTMENT: f64 = 1e12;
pub const MAX_TARIFF: f64 = 1e3;

/// User-supplied sizing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInputs {
    pub name: String,
    pub client: String,
    pub location: String,
    pub mode: CalculationMode,
    /// Installed peak capacity (kWp)
    pub peak_power_kw: f64,
    /// Daily energy demand (kWh/day)
    pub daily_consumption_kwh: f64,
    /// Average daily solar irradiation (kWh/m²/day)
    pub irradiance: f64,
    /// Battery capacity (kWh)
    pub storage_capacity_kwh: f64,
    /// Upfront cost (currency units)
    pub investment: f64,
    /// Energy price (currency per kWh)
    pub tariff: f64,
    /// Study horizon, kept for reporting only
    pub horizon_years: u32,
}

impl ProjectInputs {
    /// Boundary check run before anything is estimated or persisted.
    ///
    /// The upper bounds keep every integer output well inside `i64`.
    pub fn validate(&self) -> Result<(), InputError> {
        let numeric = [
            ("peakPowerKw", self.peak_power_kw),
            ("dailyConsumptionKwh", self.daily_consumption_kwh),
            ("irradiance", self.irradiance),
            ("storageCapacityKwh", self.storage_capacity_kwh),
            ("investment", self.investment),
            ("tariff", self.tariff),
        ];
        if let Some((field, _)) = numeric.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(InputError::NotFinite { field });
        }

        let positive = [
            ("peakPowerKw", self.peak_power_kw),
            ("dailyConsumptionKwh", self.daily_consumption_kwh),
            ("irradiance", self.irradiance),
            ("investment", self.investment),
            ("tariff", self.tariff),
        ];
        if let Some((field, _)) = positive.into_iter().find(|(_, v)| *v <= 0.0) {
            return Err(InputError::NotPositive { field });
        }

        if self.storage_capacity_kwh < 0.0 {
            return Err(InputError::Negative { field: "storageCapacityKwh" });
        }
        if self.horizon_years == 0 {
            return Err(InputError::NotPositive { field: "horizonYears" });
        }
        if self.investment < MIN_INVESTMENT {
            return Err(InputError::TooSmall { field: "investment", min: MIN_INVESTMENT });
        }

        let bounded = [
            ("peakPowerKw", self.peak_power_kw, MAX_PEAK_POWER_KW),
            ("dailyConsumptionKwh", self.daily_consumption_kwh, MAX_DAILY_CONSUMPTION_KWH),
            ("irradiance", self.irradiance, MAX_IRRADIANCE),
            ("storageCapacityKwh", self.storage_capacity_kwh, MAX_STORAGE_KWH),
            ("investment", self.investment, MAX_INVESTMENT),
            ("tariff", self.tariff, MAX_TARIFF),
        ];
        if let Some((field, _, max)) = bounded.into_iter().find(|(_, v, max)| v > max) {
            return Err(InputError::TooLarge { field, max });
        }
        Ok(())
    }
}

/// Field-level edit of a stored project's inputs. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInputsPatch {
    pub name: Option<String>,
    pub client: Option<String>,
    pub location: Option<String>,
    pub mode: Option<CalculationMode>,
    pub peak_power_kw: Option<f64>,
    pub daily_consumption_kwh: Option<f64>,
    pub irradiance: Option<f64>,
    pub storage_capacity_kwh: Option<f64>,
    pub investment: Option<f64>,
    pub tariff: Option<f64>,
    pub horizon_years: Option<u32>,
}

impl ProjectInputsPatch {
    pub fn apply_to(&self, base: &ProjectInputs) -> ProjectInputs {
        ProjectInputs {
            name: self.name.clone().unwrap_or_else(|| base.name.clone()),
            client: self.client.clone().unwrap_or_else(|| base.client.clone()),
            location: self.location.clone().unwrap_or_else(|| base.location.clone()),
            mode: self.mode.unwrap_or(base.mode),
            peak_power_kw: self.peak_power_kw.unwrap_or(base.peak_power_kw),
            daily_consumption_kwh: self.daily_consumption_kwh.unwrap_or(base.daily_consumption_kwh),
            irradiance: self.irradiance.unwrap_or(base.irradiance),
            storage_capacity_kwh: self.storage_capacity_kwh.unwrap_or(base.storage_capacity_kwh),
            investment: self.investment.unwrap_or(base.investment),
            tariff: self.tariff.unwrap_or(base.tariff),
            horizon_years: self.horizon_years.unwrap_or(base.horizon_years),
        }
    }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// Derived estimates for one input set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResult {
    /// Annual energy output (kWh)
    pub production: i64,
    /// Share of demand met by production (%), 0..=100
    pub coverage_rate: i64,
    /// Annual savings (currency units)
    pub savings: i64,
    /// Return on investment (%)
    pub roi: i64,
    /// Months to amortize the investment, never below 12
    pub payback_months: i64,
    /// Avoided emissions (t CO₂/year), two decimals
    pub co2_offset: f64,
}

impl ProjectResult {
    /// Payback in years, one decimal, as shown on reports.
    pub fn payback_years(&self) -> f64 {
        (self.payback_months as f64 / 12.0 * 10.0).round() / 10.0
    }
}

// ─── Persisted project ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inputs: ProjectInputs,
    pub result: ProjectResult,
}

/// Store-level merge: whichever halves are present replace the stored ones.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub inputs: Option<ProjectInputs>,
    pub result: Option<ProjectResult>,
}

/// How the store obtained its collection at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StoreLoad {
    /// Parsed from the persisted slot
    Loaded,
    /// Slot was empty, demonstration projects were written
    Seeded,
    /// Slot held unreadable data, demonstration projects used in memory
    RecoveredFromCorruption,
}

// ─── REST API response types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListQuery {
    /// Only return projects of this mode. Parsed into a `CalculationMode` by the handler.
    #[param(value_type = Option<CalculationMode>)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyProduction {
    pub month: String,
    pub production: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub name: String,
    pub production: i64,
    pub roi: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub project_count: usize,
    pub total_production: i64,
    pub total_savings: i64,
    pub total_co2_offset: f64,
    pub average_roi: i64,
    pub chart: Vec<ChartPoint>,
    pub recent: Vec<Project>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub projects: usize,
    pub store_load: StoreLoad,
}
