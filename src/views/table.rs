use crate::filters::{OpportunityFilters, Pagination, SortDirection, StageFilter};
use crate::format::PLACEHOLDER;
use crate::table::{OpportunityRow, COLUMNS};

/// `Stage: All Stages | Sort by: Close Date | Min amount: —`
pub fn render_filter_bar(filters: &OpportunityFilters) -> String {
    let direction = match filters.sort_dir() {
        Some(SortDirection::Asc) => " (ascending)",
        Some(SortDirection::Desc) => " (descending)",
        None => "",
    };
    let min_amount = match filters.min_amount() {
        Some(_) => filters.min_amount_text().trim(),
        None => PLACEHOLDER,
    };

    let stage = match filters.stage() {
        StageFilter::All => StageFilter::ALL_LABEL,
        StageFilter::Stage(name) => name.as_str(),
    };

    format!(
        "Stage: {} | Sort by: {}{} | Min amount: {}",
        stage,
        filters.sort_by().label(),
        direction,
        min_amount
    )
}

/// Column-aligned table with a header rule
pub fn render_table(rows: &[OpportunityRow]) -> String {
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 7]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(COLUMNS)];
    lines.push("-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    lines.extend(rows.iter().map(|row| line(row.cells())));
    lines.join("\n")
}

/// Summary plus the two pager buttons; a disabled button is shown in parentheses.
pub fn render_pagination(pagination: &Pagination) -> String {
    let button = |label: &str, enabled: bool| {
        if enabled {
            format!("[{}]", label)
        } else {
            format!("({})", label)
        }
    };

    format!(
        "{}  {} {}",
        pagination.summary(),
        button("Previous", pagination.has_previous()),
        button("Next", pagination.has_next())
    )
}
