//! Response payloads produced by the simulation and served by the routes.
//!
//! Numeric readings are kept as numbers in memory and serialized as strings,
//! matching the wire shape the dashboard client consumes.

use std::fmt::Display;

use serde::{Serialize, Serializer};

// ---

/// Three-tier health classification of a subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Optimal,
    Attention,
    Critical,
}

impl StatusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Attention => "attention",
            Self::Critical => "critical",
        }
    }
}

impl Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pair of strictly ordered cut-offs used to classify a reading.
///
/// Values below `critical_below` are critical, values below
/// `attention_below` need attention, everything else is optimal.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub critical_below: f64,
    pub attention_below: f64,
}

impl Thresholds {
    pub const fn new(critical_below: f64, attention_below: f64) -> Self {
        Self {
            critical_below,
            attention_below,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.critical_below < self.attention_below
    }

    pub fn classify(&self, value: f64) -> StatusLevel {
        // ---
        debug_assert!(self.is_ordered(), "thresholds out of order: {:?}", self);
        if value < self.critical_below {
            StatusLevel::Critical
        } else if value < self.attention_below {
            StatusLevel::Attention
        } else {
            StatusLevel::Optimal
        }
    }
}

/// One sample of a 7-point synthetic history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    pub time: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnergyData {
    /// Solar output in kW, one decimal.
    #[serde(serialize_with = "one_decimal")]
    pub solar: f64,
    /// Battery charge in percent.
    #[serde(serialize_with = "as_string")]
    pub battery: i64,
    /// Grid draw in kW, one decimal.
    #[serde(serialize_with = "one_decimal")]
    pub grid: f64,
    pub status: StatusLevel,
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterData {
    /// Reservoir level in percent.
    #[serde(serialize_with = "as_string")]
    pub reservoir: i64,
    /// Flow rate in L/min.
    #[serde(serialize_with = "as_string")]
    pub flow: i64,
    /// Water quality index in percent.
    #[serde(serialize_with = "as_string")]
    pub quality: i64,
    pub status: StatusLevel,
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IrrigationState {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgricultureData {
    /// Soil moisture in percent.
    #[serde(serialize_with = "as_string")]
    pub soil: i64,
    /// Air temperature in °C.
    #[serde(serialize_with = "as_string")]
    pub temp: i64,
    pub irrigation: IrrigationState,
    pub status: StatusLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    pub energy: String,
    pub water: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub energy: EnergyData,
    pub water: WaterData,
    pub agriculture: AgricultureData,
    pub insights: Insights,
}

/// Energy, water and agriculture readings pushed on every live tick.
#[derive(Debug, Clone, Serialize)]
pub struct DomainSnapshot {
    pub energy: EnergyData,
    pub water: WaterData,
    pub agriculture: AgricultureData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub location: String,
    /// Age or wall-clock label, e.g. `"10 min ago"` or `"7:05"`.
    pub time: String,
    pub icon: String,
    pub primary_action: String,
    pub secondary_action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IrrigationZone {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IrrigationData {
    pub zones: Vec<IrrigationZone>,
    pub recommendation: String,
}

/// Forecast category; serialized as its dashboard icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    PartlyCloudy,
    Rain,
    HeavyRain,
}

impl WeatherCondition {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Sunny => "fa-sun",
            Self::Cloudy => "fa-cloud",
            Self::PartlyCloudy => "fa-cloud-sun",
            Self::Rain => "fa-cloud-rain",
            Self::HeavyRain => "fa-cloud-showers-heavy",
        }
    }

    pub fn is_sunny(&self) -> bool {
        matches!(self, Self::Sunny | Self::PartlyCloudy)
    }

    pub fn is_rainy(&self) -> bool {
        matches!(self, Self::Rain | Self::HeavyRain)
    }
}

impl Serialize for WeatherCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.icon())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherDay {
    /// Short weekday, e.g. `"Mon"`.
    pub day: String,
    #[serde(rename = "icon")]
    pub condition: WeatherCondition,
    /// Daily high in °C.
    #[serde(rename = "temperature", serialize_with = "celsius")]
    pub temperature_c: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

// ---

fn as_string<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Display,
{
    serializer.collect_str(value)
}

fn one_decimal<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&format_args!("{:.1}", value))
}

fn celsius<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&format_args!("{}°C", value))
}
