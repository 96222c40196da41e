use super::{
    error_banner, heading, render_bar_chart, render_filter_bar, render_kpis, render_pagination,
    render_pie_chart, render_table, LOADING,
};
use crate::auth::{LOGIN_BUTTON, LOGIN_MESSAGE, LOGIN_TITLE};
use crate::charts::{pipeline_view, stage_view};
use crate::fetch::FetchState;
use crate::filters::OpportunityFilters;
use crate::models::{KpiSummary, OpportunityListResponse, PipelineData, StageData};
use crate::table::{rows, EMPTY_TABLE_MESSAGE};

pub const NAV_ITEMS: [&str; 3] = ["Dashboard", "Opportunities", "Logout"];

/// Shown while the startup auth check is in flight
pub fn render_loading() -> String {
    LOADING.to_string()
}

pub fn render_login(login_url: &str) -> String {
    [
        heading(LOGIN_TITLE),
        LOGIN_MESSAGE.to_string(),
        String::new(),
        format!("[{}] {}", LOGIN_BUTTON, login_url),
    ]
    .join("\n")
}

/// Nav bar with the active entry bracketed
pub fn render_nav(active: &str) -> String {
    NAV_ITEMS
        .iter()
        .map(|item| {
            if *item == active {
                format!("[{}]", item)
            } else {
                item.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn render_dashboard(
    kpis: &FetchState<KpiSummary>,
    pipeline: &FetchState<Vec<PipelineData>>,
    stages: &FetchState<Vec<StageData>>,
) -> String {
    [
        render_nav("Dashboard"),
        String::new(),
        render_kpis(kpis),
        String::new(),
        render_bar_chart(&pipeline_view(pipeline)),
        String::new(),
        render_pie_chart(&stage_view(stages)),
    ]
    .join("\n")
}

pub fn render_opportunities(
    filters: &OpportunityFilters,
    listing: &FetchState<OpportunityListResponse>,
) -> String {
    let mut sections = vec![
        render_nav("Opportunities"),
        String::new(),
        render_filter_bar(filters),
    ];

    if let Some(error) = &listing.error {
        sections.push(error_banner(error));
    }
    if listing.loading {
        sections.push(LOADING.to_string());
    }

    if let Some(page) = &listing.data {
        if page.records.is_empty() {
            sections.push(EMPTY_TABLE_MESSAGE.to_string());
        } else {
            sections.push(render_table(&rows(&page.records)));
        }
        if page.total > 0 {
            sections.push(render_pagination(&filters.pagination(page.total)));
        }
    }

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{EMPTY_PIPELINE_MESSAGE, EMPTY_STAGES_MESSAGE};

    #[test]
    fn test_login_prompt() {
        let text = render_login("http://localhost:8000/auth/login");
        assert!(text.starts_with(LOGIN_TITLE));
        assert!(text.contains("[Login with Salesforce] http://localhost:8000/auth/login"));
        assert!(!text.contains("Dashboard |"));
    }

    #[test]
    fn test_nav_marks_active() {
        assert_eq!(render_nav("Opportunities"), "Dashboard | [Opportunities] | Logout");
    }

    #[test]
    fn test_dashboard_empty_and_loading() {
        let mut kpis = FetchState::default();
        kpis.start();
        let mut pipeline = FetchState::default();
        pipeline.succeed(Vec::new());
        let mut stages = FetchState::default();
        stages.succeed(Vec::new());

        let text = render_dashboard(&kpis, &pipeline, &stages);
        assert!(text.contains(LOADING));
        assert!(text.contains(EMPTY_PIPELINE_MESSAGE));
        assert!(text.contains(EMPTY_STAGES_MESSAGE));
    }

    #[test]
    fn test_opportunities_without_results() {
        let mut listing = FetchState::default();
        listing.succeed(OpportunityListResponse {
            records: Vec::new(),
            total: 0,
            limit: 25,
            offset: 0,
        });

        let text = render_opportunities(&OpportunityFilters::new(), &listing);
        assert!(text.contains(EMPTY_TABLE_MESSAGE));
        assert!(!text.contains("Showing"));
    }
}
