//! Display Formatting
//!
//! Currency, percent and axis formatting shared by every view.

use chrono::NaiveDate;

/// Placeholder shown for missing values
pub const PLACEHOLDER: &str = "—";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How a KPI value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// `$1,235` (rounded, no decimals)
    Currency,
    /// `1234.5%` (raw value)
    Percent,
    /// `1,235`
    Number,
}

impl ValueFormat {
    pub fn apply(&self, value: f64) -> String {
        match self {
            ValueFormat::Currency => format_currency(value),
            ValueFormat::Percent => format_percent(value),
            ValueFormat::Number => format_number(value),
        }
    }
}

/// Whole-dollar currency with thousands separators.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// Percent of an already-scaled value (`50.0` → `"50%"`).
pub fn format_percent(value: f64) -> String {
    format!("{}%", value)
}

/// Rounded number with thousands separators.
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(rounded.abs() as u64))
}

/// Y-axis tick: `25000` → `"$25K"`.
pub fn format_thousands(value: f64) -> String {
    let thousands = (value / 1000.0).round();
    let sign = if thousands < 0.0 { "-" } else { "" };
    format!("{}${}K", sign, group_thousands(thousands.abs() as u64))
}

/// `{MonthAbbrev} {Year}` for a 1-based month.
pub fn month_label(month: u32, year: i32) -> String {
    let abbrev = month
        .checked_sub(1)
        .and_then(|idx| MONTH_ABBREVIATIONS.get(idx as usize))
        .copied()
        .unwrap_or("???");
    format!("{} {}", abbrev, year)
}

/// `Mar 5, 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
