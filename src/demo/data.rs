//! Demo Dataset
//!
//! A seeded, in-memory set of opportunities plus the aggregates the backend
//! computes over it. Same seed and same `today` always give the same data.

use chrono::{Datelike, Duration, Months, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::error::DemoError;
use crate::filters::PIPELINE_STAGES;
use crate::models::{
    KpiMetric, KpiSummary, Opportunity, OpportunityListResponse, PipelineData, StageData,
};

/// Win probability per stage, aligned with [`PIPELINE_STAGES`]
const STAGE_PROBABILITIES: [f64; 10] = [10.0, 20.0, 40.0, 50.0, 60.0, 70.0, 75.0, 90.0, 100.0, 0.0];

const NUM_ACCOUNTS: usize = 80;
const NUM_OWNERS: usize = 15;

const FIRST_NAMES: [&str; NUM_OWNERS] = [
    "Sarah", "James", "Maria", "David", "Jennifer", "Michael", "Lisa", "Robert", "Emily",
    "William", "Jessica", "Daniel", "Ashley", "Chris", "Amanda",
];
const LAST_NAMES: [&str; NUM_OWNERS] = [
    "Johnson", "Smith", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore",
];

const COMPANY_PREFIXES: [&str; 10] = [
    "Acme", "Global", "Summit", "Atlas", "Nexus", "Pinnacle", "Vertex", "Horizon", "Catalyst",
    "Quantum",
];
const COMPANY_SUFFIXES: [&str; 10] = [
    "Corp", "Inc", "Systems", "Solutions", "Group", "Technologies", "Enterprises", "Partners",
    "Industries", "Labs",
];

const DEAL_KINDS: [&str; 7] = [
    "Expansion", "Renewal", "New Deal", "Upgrade", "Implementation", "Migration", "Platform",
];

const TYPES: [&str; 4] = [
    "New Customer",
    "Existing Customer - Upgrade",
    "Existing Customer - Replacement",
    "Existing Customer - Downgrade",
];

const MIN_AMOUNT: f64 = 1_000.0;
const MAX_AMOUNT: f64 = 5_000_000.0;

pub const MAX_LIMIT: u32 = 200;

/// One generated opportunity with the flags the aggregates need
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOpportunity {
    pub id: String,
    pub name: String,
    pub stage_name: String,
    pub amount: f64,
    pub probability: f64,
    pub created_date: NaiveDate,
    pub close_date: NaiveDate,
    pub owner_id: String,
    pub owner_name: String,
    pub account_name: String,
    pub opportunity_type: String,
    pub is_closed: bool,
    pub is_won: bool,
}

impl DemoOpportunity {
    pub fn to_record(&self) -> Opportunity {
        Opportunity {
            id: self.id.clone(),
            name: self.name.clone(),
            stage_name: self.stage_name.clone(),
            amount: Some(self.amount),
            close_date: Some(self.close_date),
            probability: Some(self.probability),
            owner: Some(self.owner_name.clone()),
            account: Some(self.account_name.clone()),
            opportunity_type: Some(self.opportunity_type.clone()),
        }
    }
}

/// `GET /api/opportunities` parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    pub stage: Option<String>,
    pub owner_id: Option<String>,
    pub min_amount: Option<f64>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_dir")]
    pub sort_dir: String,
}

fn default_limit() -> u32 {
    50
}

fn default_sort_by() -> String {
    "CloseDate".to_string()
}

fn default_sort_dir() -> String {
    "DESC".to_string()
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            stage: None,
            owner_id: None,
            min_amount: None,
            sort_by: default_sort_by(),
            sort_dir: default_sort_dir(),
        }
    }
}

impl ListParams {
    pub fn validate(&self) -> Result<(), DemoError> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(DemoError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        Ok(())
    }
}

pub struct DemoDataset {
    records: Vec<DemoOpportunity>,
    today: NaiveDate,
}

impl DemoDataset {
    /// Generate `count` opportunities around `today`
    pub fn generate(seed: u64, count: usize, today: NaiveDate) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let owners: Vec<(String, String)> = (0..NUM_OWNERS)
            .map(|i| {
                (
                    format!("005{:012}", i),
                    format!("{} {}", FIRST_NAMES[i], LAST_NAMES[i]),
                )
            })
            .collect();
        let accounts = generate_accounts(&mut rng);

        let records = (0..count)
            .map(|i| {
                let stage_idx = rng.gen_range(0..PIPELINE_STAGES.len());
                let stage_name = PIPELINE_STAGES[stage_idx];
                let is_closed = stage_name.starts_with("Closed");
                let is_won = stage_name == "Closed Won";

                let created_date = today - Duration::days(rng.gen_range(30..=540));
                let close_date = if is_closed {
                    created_date + Duration::days(rng.gen_range(14..=180))
                } else {
                    today + Duration::days(rng.gen_range(-30..=180))
                };

                let amount = lognormal_amount(&mut rng);
                let account = &accounts[rng.gen_range(0..accounts.len())];
                let (owner_id, owner_name) = &owners[rng.gen_range(0..owners.len())];
                let kind = DEAL_KINDS[rng.gen_range(0..DEAL_KINDS.len())];
                let opportunity_type = TYPES[rng.gen_range(0..TYPES.len())];

                DemoOpportunity {
                    id: format!("006{:012}", i),
                    name: format!("{} - {}", account, kind),
                    stage_name: stage_name.to_string(),
                    amount,
                    probability: STAGE_PROBABILITIES[stage_idx],
                    created_date,
                    close_date,
                    owner_id: owner_id.clone(),
                    owner_name: owner_name.clone(),
                    account_name: account.clone(),
                    opportunity_type: opportunity_type.to_string(),
                    is_closed,
                    is_won,
                }
            })
            .collect();

        Self { records, today }
    }

    /// Wrap hand-built records (used by tests and fixtures)
    pub fn from_records(records: Vec<DemoOpportunity>, today: NaiveDate) -> Self {
        Self { records, today }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Open pipeline plus deals won/lost in the current calendar quarter
    pub fn kpis(&self) -> KpiSummary {
        let (q_start, q_end) = quarter_bounds(self.today);
        let in_quarter = |r: &&DemoOpportunity| r.close_date >= q_start && r.close_date < q_end;

        let open: Vec<&DemoOpportunity> = self.records.iter().filter(|r| !r.is_closed).collect();
        let won: Vec<&DemoOpportunity> = self
            .records
            .iter()
            .filter(|r| r.is_won)
            .filter(in_quarter)
            .collect();
        let lost: Vec<&DemoOpportunity> = self
            .records
            .iter()
            .filter(|r| r.is_closed && !r.is_won)
            .filter(in_quarter)
            .collect();

        let mut open_metric = metric(&open);
        if !open.is_empty() {
            open_metric.average = Some(open_metric.total / open.len() as f64);
        }

        KpiSummary {
            open: open_metric,
            won: metric(&won),
            lost: metric(&lost),
        }
    }

    /// Open opportunities grouped by stage, sorted by stage name
    pub fn stages(&self) -> Vec<StageData> {
        let mut groups: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
        for record in self.records.iter().filter(|r| !r.is_closed) {
            let entry = groups.entry(record.stage_name.as_str()).or_default();
            entry.0 += 1;
            entry.1 += record.amount;
        }

        groups
            .into_iter()
            .map(|(stage, (count, total))| StageData {
                stage_name: stage.to_string(),
                count,
                total_amount: total,
            })
            .collect()
    }

    /// Close-date totals per month over the last `months * 30` days
    pub fn pipeline(&self, months: u32) -> Vec<PipelineData> {
        // Windows reaching past the calendar cover every record
        let cutoff = self
            .today
            .checked_sub_signed(Duration::days(i64::from(months) * 30))
            .unwrap_or(NaiveDate::MIN);

        let mut groups: BTreeMap<(i32, u32), (f64, u64)> = BTreeMap::new();
        for record in self.records.iter().filter(|r| r.close_date >= cutoff) {
            let key = (record.close_date.year(), record.close_date.month());
            let entry = groups.entry(key).or_default();
            entry.0 += record.amount;
            entry.1 += 1;
        }

        groups
            .into_iter()
            .map(|((year, month), (total, count))| PipelineData {
                month,
                year,
                total,
                count,
            })
            .collect()
    }

    /// Filter, sort, then page
    pub fn list(&self, params: &ListParams) -> Result<OpportunityListResponse, DemoError> {
        params.validate()?;

        let stage = params.stage.as_deref().filter(|s| !s.is_empty());
        let owner = params.owner_id.as_deref().filter(|s| !s.is_empty());

        let mut filtered: Vec<&DemoOpportunity> = self
            .records
            .iter()
            .filter(|r| stage.map_or(true, |s| r.stage_name == s))
            .filter(|r| owner.map_or(true, |o| r.owner_id == o))
            .filter(|r| params.min_amount.map_or(true, |min| r.amount >= min))
            .collect();

        // Unknown columns keep generation order
        if let Some(compare) = column_order(&params.sort_by) {
            let ascending = params.sort_dir.eq_ignore_ascii_case("ASC");
            filtered.sort_by(|a, b| {
                let ord = compare(a, b);
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        let total = filtered.len() as u64;
        let records = filtered
            .into_iter()
            .skip(params.offset as usize)
            .take(params.limit as usize)
            .map(DemoOpportunity::to_record)
            .collect();

        Ok(OpportunityListResponse {
            records,
            total,
            limit: params.limit,
            offset: params.offset,
        })
    }
}

type Comparator = fn(&DemoOpportunity, &DemoOpportunity) -> Ordering;

fn column_order(column: &str) -> Option<Comparator> {
    let compare: Comparator = match column {
        "CloseDate" => |a, b| a.close_date.cmp(&b.close_date),
        "Amount" => |a, b| a.amount.total_cmp(&b.amount),
        "Name" => |a, b| a.name.cmp(&b.name),
        "StageName" => |a, b| a.stage_name.cmp(&b.stage_name),
        "Owner.Name" => |a, b| a.owner_name.cmp(&b.owner_name),
        "Account.Name" => |a, b| a.account_name.cmp(&b.account_name),
        _ => return None,
    };
    Some(compare)
}

fn metric(records: &[&DemoOpportunity]) -> KpiMetric {
    KpiMetric {
        count: records.len() as u64,
        total: records.iter().map(|r| r.amount).sum(),
        average: None,
    }
}

/// `[first day of quarter, first day of next quarter)`
fn quarter_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_month = (today.month() - 1) / 3 * 3 + 1;
    let start = NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today);
    let end = start
        .checked_add_months(Months::new(3))
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}

fn generate_accounts(rng: &mut StdRng) -> Vec<String> {
    let mut used = HashSet::new();
    let mut accounts = Vec::with_capacity(NUM_ACCOUNTS);

    while accounts.len() < NUM_ACCOUNTS {
        let name = format!(
            "{} {}",
            COMPANY_PREFIXES.choose(rng).copied().unwrap_or("Acme"),
            COMPANY_SUFFIXES.choose(rng).copied().unwrap_or("Corp"),
        );
        if used.insert(name.clone()) {
            accounts.push(name);
        }
    }
    accounts
}

/// Log-normal around $50K, rounded to hundreds and clipped
fn lognormal_amount(rng: &mut StdRng) -> f64 {
    // Box-Muller; 1 - gen() keeps u1 away from zero
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();

    let amount = ((10.8 + 1.2 * z).exp() / 100.0).round() * 100.0;
    amount.clamp(MIN_AMOUNT, MAX_AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 15).unwrap()
    }

    fn record(id: &str, stage: &str, amount: f64, close: (i32, u32, u32)) -> DemoOpportunity {
        DemoOpportunity {
            id: id.to_string(),
            name: format!("Deal {}", id),
            stage_name: stage.to_string(),
            amount,
            probability: 50.0,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            close_date: NaiveDate::from_ymd_opt(close.0, close.1, close.2).unwrap(),
            owner_id: "005000000000000".to_string(),
            owner_name: "Sarah Johnson".to_string(),
            account_name: "Acme Corp".to_string(),
            opportunity_type: "New Customer".to_string(),
            is_closed: stage.starts_with("Closed"),
            is_won: stage == "Closed Won",
        }
    }

    fn fixture() -> DemoDataset {
        DemoDataset::from_records(
            vec![
                record("1", "Prospecting", 10_000.0, (2025, 6, 1)),
                record("2", "Negotiation/Review", 30_000.0, (2025, 7, 1)),
                record("3", "Closed Won", 50_000.0, (2025, 4, 2)),
                record("4", "Closed Won", 70_000.0, (2025, 3, 31)),
                record("5", "Closed Lost", 5_000.0, (2025, 6, 30)),
                record("6", "Prospecting", 2_000.0, (2023, 1, 10)),
            ],
            today(),
        )
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = DemoDataset::generate(7, 50, today());
        let b = DemoDataset::generate(7, 50, today());
        assert_eq!(a.records, b.records);
        assert_eq!(a.len(), 50);

        for r in &a.records {
            assert!(r.amount >= MIN_AMOUNT && r.amount <= MAX_AMOUNT);
            assert!(PIPELINE_STAGES.contains(&r.stage_name.as_str()));
            assert!(r.name.starts_with(&r.account_name));
        }
    }

    #[test]
    fn test_kpis_use_current_quarter() {
        let kpis = fixture().kpis();

        assert_eq!(kpis.open.count, 3);
        assert_eq!(kpis.open.total, 42_000.0);
        assert_eq!(kpis.open.average, Some(14_000.0));
        // Record 4 closed in the previous quarter
        assert_eq!(kpis.won.count, 1);
        assert_eq!(kpis.won.total, 50_000.0);
        assert_eq!(kpis.lost.count, 1);
    }

    #[test]
    fn test_stages_only_open_sorted_by_name() {
        let stages = fixture().stages();
        let names: Vec<&str> = stages.iter().map(|s| s.stage_name.as_str()).collect();
        assert_eq!(names, vec!["Negotiation/Review", "Prospecting"]);
        assert_eq!(stages[1].count, 2);
        assert_eq!(stages[1].total_amount, 12_000.0);
    }

    #[test]
    fn test_pipeline_window_is_chronological() {
        let pipeline = fixture().pipeline(12);
        let keys: Vec<(i32, u32)> = pipeline.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(keys, vec![(2025, 3), (2025, 4), (2025, 6), (2025, 7)]);

        let june = &pipeline[2];
        assert_eq!(june.count, 2);
        assert_eq!(june.total, 15_000.0);
    }

    #[test]
    fn test_pipeline_window_past_calendar_covers_everything() {
        let pipeline = fixture().pipeline(4_000_000);
        assert_eq!(pipeline.len(), 5);
        assert_eq!((pipeline[0].year, pipeline[0].month), (2023, 1));
        assert_eq!(pipeline.iter().map(|p| p.count).sum::<u64>(), 6);

        let generated = DemoDataset::generate(1, 10, today()).pipeline(u32::MAX);
        assert_eq!(generated.iter().map(|p| p.count).sum::<u64>(), 10);
    }

    #[test]
    fn test_list_filters_sorts_and_pages() {
        let data = fixture();
        let params = ListParams {
            stage: Some("Closed Won".to_string()),
            sort_by: "Amount".to_string(),
            ..ListParams::default()
        };

        let page = data.list(&params).unwrap();
        assert_eq!(page.total, 2);
        let amounts: Vec<f64> = page.records.iter().filter_map(|r| r.amount).collect();
        assert_eq!(amounts, vec![70_000.0, 50_000.0]);

        let params = ListParams {
            limit: 2,
            offset: 4,
            sort_dir: "asc".to_string(),
            ..ListParams::default()
        };
        let page = data.list(&params).unwrap();
        assert_eq!(page.total, 6);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[1].id, "2");
    }

    #[test]
    fn test_list_min_amount_and_limit_bounds() {
        let data = fixture();
        let params = ListParams {
            min_amount: Some(30_000.0),
            ..ListParams::default()
        };
        assert_eq!(data.list(&params).unwrap().total, 3);

        let params = ListParams {
            limit: 201,
            ..ListParams::default()
        };
        assert!(matches!(data.list(&params), Err(DemoError::Validation(_))));
    }

    #[test]
    fn test_quarter_bounds() {
        let (start, end) = quarter_bounds(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
