//! Opportunity Table Rows
//!
//! Display cells for one opportunity, in column order.

use crate::format::{format_currency, format_date, format_percent, PLACEHOLDER};
use crate::models::Opportunity;

pub const COLUMNS: [&str; 7] = [
    "Name",
    "Account",
    "Stage",
    "Amount",
    "Close Date",
    "Probability",
    "Owner",
];

pub const EMPTY_TABLE_MESSAGE: &str = "No opportunities match these filters";

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityRow {
    pub id: String,
    pub name: String,
    pub account: String,
    pub stage: String,
    pub amount: String,
    pub close_date: String,
    pub probability: String,
    pub owner: String,
}

impl OpportunityRow {
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.name,
            &self.account,
            &self.stage,
            &self.amount,
            &self.close_date,
            &self.probability,
            &self.owner,
        ]
    }
}

impl From<&Opportunity> for OpportunityRow {
    fn from(opp: &Opportunity) -> Self {
        Self {
            id: opp.id.clone(),
            name: opp.name.clone(),
            account: or_placeholder(opp.account.clone()),
            stage: opp.stage_name.clone(),
            amount: or_placeholder(opp.amount.map(format_currency)),
            close_date: or_placeholder(opp.close_date.map(format_date)),
            probability: or_placeholder(opp.probability.map(format_percent)),
            owner: or_placeholder(opp.owner.clone()),
        }
    }
}

pub fn rows(records: &[Opportunity]) -> Vec<OpportunityRow> {
    records.iter().map(OpportunityRow::from).collect()
}

fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_string())
}
