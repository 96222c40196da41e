//! Data Model
//!
//! Plain records mirrored from the CRM. Field names follow the backend's wire
//! format (Salesforce-style `PascalCase` for records, aggregate aliases such as
//! `cnt` for grouped queries); the Rust side exposes them as snake_case fields.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================
// KPIs
// ============================================

/// A computed aggregate over a set of opportunities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiMetric {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

/// The three fixed KPI categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KpiCategory {
    Open,
    Won,
    Lost,
}

impl KpiCategory {
    pub const ALL: [KpiCategory; 3] = [KpiCategory::Open, KpiCategory::Won, KpiCategory::Lost];

    pub fn label(&self) -> &'static str {
        match self {
            KpiCategory::Open => "Open Pipeline",
            KpiCategory::Won => "Won This Quarter",
            KpiCategory::Lost => "Lost This Quarter",
        }
    }
}

/// KPI summary keyed by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    #[serde(rename = "open_pipeline", default)]
    pub open: KpiMetric,
    #[serde(rename = "won_this_quarter", default)]
    pub won: KpiMetric,
    #[serde(rename = "lost_this_quarter", default)]
    pub lost: KpiMetric,
}

impl KpiSummary {
    pub fn get(&self, category: KpiCategory) -> &KpiMetric {
        match category {
            KpiCategory::Open => &self.open,
            KpiCategory::Won => &self.won,
            KpiCategory::Lost => &self.lost,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (KpiCategory, &KpiMetric)> {
        KpiCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

// ============================================
// Aggregates
// ============================================

/// One row per pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageData {
    #[serde(rename = "StageName")]
    pub stage_name: String,
    #[serde(rename = "cnt", default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(rename = "total_amount", default, deserialize_with = "null_as_default")]
    pub total_amount: f64,
}

/// One row per calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineData {
    pub month: u32,
    pub year: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(rename = "cnt", default, deserialize_with = "null_as_default")]
    pub count: u64,
}

/// `GET /api/dashboard/stages` envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagesResponse {
    #[serde(default)]
    pub stages: Vec<StageData>,
}

/// `GET /api/dashboard/pipeline` envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineResponse {
    #[serde(default)]
    pub pipeline: Vec<PipelineData>,
}

// ============================================
// Opportunities
// ============================================

/// A CRM opportunity projected to display fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "StageName")]
    pub stage_name: String,
    #[serde(rename = "Amount", default)]
    pub amount: Option<f64>,
    #[serde(rename = "CloseDate", default, with = "lenient_date")]
    pub close_date: Option<NaiveDate>,
    #[serde(rename = "Probability", default)]
    pub probability: Option<f64>,
    #[serde(rename = "Owner", default, with = "named_ref")]
    pub owner: Option<String>,
    #[serde(rename = "Account", default, with = "named_ref")]
    pub account: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "empty_as_none")]
    pub opportunity_type: Option<String>,
}

/// Pagination envelope for `GET /api/opportunities`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityListResponse {
    #[serde(default)]
    pub records: Vec<Opportunity>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

// ============================================
// Auth / Health
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub demo_mode: bool,
}

/// Error body emitted by the backend (`{"detail": "..."}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

// ============================================
// Serde helpers
// ============================================

/// Aggregates over zero rows come back as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// Relationship fields arrive as `{"Name": "..."}` objects.
mod named_ref {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct NamedRef {
        #[serde(rename = "Name", default)]
        name: Option<String>,
    }

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value
            .as_ref()
            .map(|name| NamedRef {
                name: Some(name.clone()),
            })
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let named = Option::<NamedRef>::deserialize(deserializer)?;
        Ok(named
            .and_then(|n| n.name)
            .filter(|name| !name.is_empty()))
    }
}

/// Accepts `2025-03-05`, `2025-03-05T00:00:00` and `""`.
mod lenient_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => s,
            _ => return Ok(None),
        };

        let date_part = raw.get(..10).unwrap_or(&raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid CloseDate '{}': {}", raw, e)))
    }
}
