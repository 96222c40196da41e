//! Opportunity Filters & Pagination
//!
//! The filter bar state and the request bag it produces. Changing the stage or
//! the minimum amount always returns to the first page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed page size of the opportunity table
pub const PAGE_SIZE: u32 = 25;

/// Standard CRM pipeline stages, in pipeline order
pub const PIPELINE_STAGES: [&str; 10] = [
    "Prospecting",
    "Qualification",
    "Needs Analysis",
    "Value Proposition",
    "Id. Decision Makers",
    "Perception Analysis",
    "Proposal/Price Quote",
    "Negotiation/Review",
    "Closed Won",
    "Closed Lost",
];

/// Stage filter: either every stage or one named stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StageFilter {
    #[default]
    All,
    Stage(String),
}

impl StageFilter {
    /// Label of the "all" option in the stage selector
    pub const ALL_LABEL: &'static str = "All Stages";

    /// Build from a selector value; the empty string and "all" map to [`StageFilter::All`].
    pub fn from_selection(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") || value == Self::ALL_LABEL {
            StageFilter::All
        } else {
            StageFilter::Stage(value.to_string())
        }
    }

    /// Value sent to the backend, `None` for no filter
    pub fn as_param(&self) -> Option<&str> {
        match self {
            StageFilter::All => None,
            StageFilter::Stage(name) => Some(name.as_str()),
        }
    }

    /// Selector value (empty string for "all")
    pub fn selection(&self) -> &str {
        self.as_param().unwrap_or("")
    }
}

/// Allowed sort columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "CloseDate")]
    CloseDate,
    #[serde(rename = "Amount")]
    Amount,
    #[serde(rename = "Name")]
    Name,
    #[serde(rename = "StageName")]
    Stage,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::CloseDate,
        SortField::Amount,
        SortField::Name,
        SortField::Stage,
    ];

    /// Column name understood by the backend
    pub fn as_param(&self) -> &'static str {
        match self {
            SortField::CloseDate => "CloseDate",
            SortField::Amount => "Amount",
            SortField::Name => "Name",
            SortField::Stage => "StageName",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::CloseDate => "Close Date",
            SortField::Amount => "Amount",
            SortField::Name => "Name",
            SortField::Stage => "Stage",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' ', '-'], "").as_str() {
            "closedate" => Ok(SortField::CloseDate),
            "amount" => Ok(SortField::Amount),
            "name" => Ok(SortField::Name),
            "stage" | "stagename" => Ok(SortField::Stage),
            _ => Err(FilterError::InvalidSortField(s.to_string())),
        }
    }
}

/// Sort direction (backend default is descending)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(FilterError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Filter parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid sort field: {0}. Use close_date, amount, name or stage")]
    InvalidSortField(String),

    #[error("Invalid sort direction: {0}. Use ASC or DESC")]
    InvalidSortDirection(String),
}

/// Query bag for `GET /api/opportunities`
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityQuery {
    pub limit: u32,
    pub offset: u32,
    pub stage: Option<String>,
    pub sort_by: SortField,
    pub sort_dir: Option<SortDirection>,
    pub min_amount: Option<f64>,
    pub owner_id: Option<String>,
}

impl Default for OpportunityQuery {
    fn default() -> Self {
        Self {
            limit: PAGE_SIZE,
            offset: 0,
            stage: None,
            sort_by: SortField::default(),
            sort_dir: None,
            min_amount: None,
            owner_id: None,
        }
    }
}

impl OpportunityQuery {
    /// Query-string pairs; unset optional members are omitted.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("sort_by", self.sort_by.as_param().to_string()),
        ];

        if let Some(stage) = &self.stage {
            pairs.push(("stage", stage.clone()));
        }
        if let Some(dir) = self.sort_dir {
            pairs.push(("sort_dir", dir.as_param().to_string()));
        }
        if let Some(min) = self.min_amount {
            pairs.push(("min_amount", min.to_string()));
        }
        if let Some(owner) = &self.owner_id {
            pairs.push(("owner_id", owner.clone()));
        }

        pairs
    }
}

/// Filter bar + pagination state of the opportunity table
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityFilters {
    stage: StageFilter,
    sort_by: SortField,
    sort_dir: Option<SortDirection>,
    min_amount: String,
    offset: u32,
}

impl Default for OpportunityFilters {
    fn default() -> Self {
        Self {
            stage: StageFilter::All,
            sort_by: SortField::CloseDate,
            sort_dir: None,
            min_amount: String::new(),
            offset: 0,
        }
    }
}

impl OpportunityFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> &StageFilter {
        &self.stage
    }

    pub fn sort_by(&self) -> SortField {
        self.sort_by
    }

    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    /// Raw text of the minimum amount input
    pub fn min_amount_text(&self) -> &str {
        &self.min_amount
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn set_stage(&mut self, stage: StageFilter) {
        self.stage = stage;
        self.offset = 0;
    }

    pub fn set_min_amount(&mut self, text: impl Into<String>) {
        self.min_amount = text.into();
        self.offset = 0;
    }

    pub fn set_sort_by(&mut self, field: SortField) {
        self.sort_by = field;
    }

    pub fn set_sort_dir(&mut self, dir: Option<SortDirection>) {
        self.sort_dir = dir;
    }

    /// Jump to an absolute offset (used when restoring a page from the CLI)
    pub fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }

    /// Parsed minimum amount; empty or unparseable text means no filter.
    pub fn min_amount(&self) -> Option<f64> {
        let text = self.min_amount.trim();
        if text.is_empty() {
            return None;
        }
        text.replace([',', '$'], "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    /// Advance one page unless already on the last one
    pub fn next_page(&mut self, total: u64) -> bool {
        if self.pagination(total).has_next() {
            self.offset += PAGE_SIZE;
            true
        } else {
            false
        }
    }

    /// Go back one page unless already on the first one
    pub fn previous_page(&mut self) -> bool {
        if self.offset == 0 {
            return false;
        }
        self.offset = self.offset.saturating_sub(PAGE_SIZE);
        true
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination {
            offset: self.offset,
            limit: PAGE_SIZE,
            total,
        }
    }

    pub fn to_query(&self) -> OpportunityQuery {
        OpportunityQuery {
            limit: PAGE_SIZE,
            offset: self.offset,
            stage: self.stage.as_param().map(str::to_string),
            sort_by: self.sort_by,
            sort_dir: self.sort_dir,
            min_amount: self.min_amount(),
            owner_id: None,
        }
    }
}

/// Pager derived from the current offset and the server-reported total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u32,
    pub limit: u32,
    pub total: u64,
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.offset) + u64::from(self.limit) < self.total
    }

    /// Last row shown on this page (1-based)
    pub fn last_row(&self) -> u64 {
        (u64::from(self.offset) + u64::from(self.limit)).min(self.total)
    }

    /// `Showing 26–50 of 120`, or `Showing 0 of 120` past the last row
    pub fn summary(&self) -> String {
        if u64::from(self.offset) >= self.total {
            return format!("Showing 0 of {}", self.total);
        }
        format!(
            "Showing {}–{} of {}",
            u64::from(self.offset) + 1,
            self.last_row(),
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_change_resets_offset() {
        let mut filters = OpportunityFilters::new();
        filters.set_offset(50);
        filters.set_stage(StageFilter::Stage("Closed Won".to_string()));
        assert_eq!(filters.offset(), 0);

        filters.set_offset(75);
        filters.set_stage(StageFilter::All);
        assert_eq!(filters.offset(), 0);
    }

    #[test]
    fn test_min_amount_change_resets_offset() {
        let mut filters = OpportunityFilters::new();
        filters.set_offset(25);
        filters.set_min_amount("10000");
        assert_eq!(filters.offset(), 0);
        assert_eq!(filters.min_amount(), Some(10000.0));
    }

    #[test]
    fn test_sort_change_keeps_offset() {
        let mut filters = OpportunityFilters::new();
        filters.set_offset(25);
        filters.set_sort_by(SortField::Amount);
        assert_eq!(filters.offset(), 25);
    }

    #[test]
    fn test_min_amount_parsing() {
        let mut filters = OpportunityFilters::new();
        assert_eq!(filters.min_amount(), None);

        filters.set_min_amount("   ");
        assert_eq!(filters.min_amount(), None);

        filters.set_min_amount("$25,000");
        assert_eq!(filters.min_amount(), Some(25000.0));

        filters.set_min_amount("lots");
        assert_eq!(filters.min_amount(), None);
    }

    #[test]
    fn test_pagination_buttons() {
        let first = Pagination { offset: 0, limit: 25, total: 60 };
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = Pagination { offset: 50, limit: 25, total: 60 };
        assert!(last.has_previous());
        assert!(!last.has_next());

        let exact = Pagination { offset: 25, limit: 25, total: 50 };
        assert!(!exact.has_next());

        let empty = Pagination { offset: 0, limit: 25, total: 0 };
        assert!(!empty.has_previous());
        assert!(!empty.has_next());
    }

    #[test]
    fn test_pagination_summary() {
        assert_eq!(
            Pagination { offset: 0, limit: 25, total: 120 }.summary(),
            "Showing 1–25 of 120"
        );
        assert_eq!(
            Pagination { offset: 100, limit: 25, total: 120 }.summary(),
            "Showing 101–120 of 120"
        );
    }

    #[test]
    fn test_pagination_summary_past_last_row() {
        let mut filters = OpportunityFilters::new();
        filters.set_offset(4 * PAGE_SIZE);
        let pagination = filters.pagination(100);
        assert_eq!(pagination.summary(), "Showing 0 of 100");
        assert!(pagination.has_previous());
        assert!(!pagination.has_next());

        assert_eq!(
            Pagination { offset: 150, limit: 25, total: 100 }.summary(),
            "Showing 0 of 100"
        );
    }

    #[test]
    fn test_page_navigation() {
        let mut filters = OpportunityFilters::new();
        assert!(!filters.previous_page());
        assert!(filters.next_page(30));
        assert_eq!(filters.offset(), 25);
        assert!(!filters.next_page(30));
        assert!(filters.previous_page());
        assert_eq!(filters.offset(), 0);
    }

    #[test]
    fn test_query_pairs() {
        let mut filters = OpportunityFilters::new();
        filters.set_stage(StageFilter::from_selection("Closed Won"));
        filters.set_sort_by(SortField::Amount);

        let pairs = filters.to_query().to_pairs();
        assert!(pairs.contains(&("limit", "25".to_string())));
        assert!(pairs.contains(&("offset", "0".to_string())));
        assert!(pairs.contains(&("stage", "Closed Won".to_string())));
        assert!(pairs.contains(&("sort_by", "Amount".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "min_amount"));
    }

    #[test]
    fn test_stage_selection_sentinel() {
        assert_eq!(StageFilter::from_selection(""), StageFilter::All);
        assert_eq!(StageFilter::from_selection("all"), StageFilter::All);
        assert_eq!(StageFilter::All.as_param(), None);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("close_date".parse::<SortField>(), Ok(SortField::CloseDate));
        assert_eq!("StageName".parse::<SortField>(), Ok(SortField::Stage));
        assert_eq!("AMOUNT".parse::<SortField>(), Ok(SortField::Amount));
        assert!("probability".parse::<SortField>().is_err());
    }
}
