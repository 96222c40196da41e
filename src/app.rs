//! Root Controller
//!
//! Auth gate plus the two pages. The session status is checked once when the
//! app starts; until it resolves only a loading screen is available, and a
//! signed-out session only ever gets the login prompt.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::AuthState;
use crate::client::DashboardApi;
use crate::config::DashboardConfig;
use crate::fetch::Resource;
use crate::filters::{OpportunityFilters, SortField, StageFilter};
use crate::models::{KpiSummary, OpportunityListResponse, PipelineData, StageData};
use crate::views;

/// Routes of the authenticated shell
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Dashboard,
    Opportunities(OpportunityFilters),
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Opportunities(_) => "Opportunities",
        }
    }
}

/// What the app shows for a route
pub enum Screen {
    Loading,
    Login { login_url: String },
    Dashboard(DashboardPage),
    Opportunities(OpportunityTablePage),
}

impl Screen {
    /// Wait for every fetch the screen started
    pub async fn settled(&self) {
        match self {
            Screen::Dashboard(page) => page.settled().await,
            Screen::Opportunities(page) => page.settled().await,
            Screen::Loading | Screen::Login { .. } => {}
        }
    }

    pub fn render(&self) -> String {
        match self {
            Screen::Loading => views::render_loading(),
            Screen::Login { login_url } => views::render_login(login_url),
            Screen::Dashboard(page) => page.render(),
            Screen::Opportunities(page) => page.render(),
        }
    }
}

pub struct App {
    api: Arc<dyn DashboardApi>,
    config: DashboardConfig,
    auth: AuthState,
}

impl App {
    pub fn new(api: Arc<dyn DashboardApi>, config: DashboardConfig) -> Self {
        Self {
            api,
            config,
            auth: AuthState::Unknown,
        }
    }

    /// Build the app and run the startup status check
    pub async fn start(api: impl DashboardApi + 'static, config: DashboardConfig) -> Self {
        let mut app = Self::new(Arc::new(api), config);
        app.check_auth().await;
        app
    }

    /// The one status check. Later calls return the first answer.
    pub async fn check_auth(&mut self) -> AuthState {
        if self.auth.is_known() {
            return self.auth;
        }

        let result = self.api.auth_status().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Auth status check failed; treating session as signed out");
        }
        self.auth = AuthState::resolve(result);
        tracing::info!(state = ?self.auth, "Auth state resolved");
        self.auth
    }

    pub fn auth(&self) -> AuthState {
        self.auth
    }

    /// Mount the screen for `route`; pages start fetching immediately.
    pub fn open(&self, route: Route) -> Screen {
        match self.auth {
            AuthState::Unknown => Screen::Loading,
            AuthState::Unauthenticated => Screen::Login {
                login_url: self.api.login_url(),
            },
            AuthState::Authenticated => match route {
                Route::Dashboard => Screen::Dashboard(DashboardPage::mount(
                    Arc::clone(&self.api),
                    self.config.pipeline_months,
                )),
                Route::Opportunities(filters) => Screen::Opportunities(
                    OpportunityTablePage::mount(Arc::clone(&self.api), filters),
                ),
            },
        }
    }

    /// Open `route`, wait for its data and render it
    pub async fn render(&self, route: Route) -> String {
        let screen = self.open(route);
        screen.settled().await;
        screen.render()
    }
}

/// KPI cards, pipeline chart and stage chart, fetched independently
pub struct DashboardPage {
    kpis: Resource<KpiSummary>,
    pipeline: Resource<Vec<PipelineData>>,
    stages: Resource<Vec<StageData>>,
}

impl DashboardPage {
    pub fn mount(api: Arc<dyn DashboardApi>, months: u32) -> Self {
        let page = Self {
            kpis: Resource::new("kpis"),
            pipeline: Resource::new("pipeline"),
            stages: Resource::new("stages"),
        };

        let kpis_api = Arc::clone(&api);
        page.kpis.fetch(async move { kpis_api.kpis().await });

        let pipeline_api = Arc::clone(&api);
        page.pipeline
            .fetch(async move { pipeline_api.pipeline(months).await });

        page.stages.fetch(async move { api.stages().await });

        page
    }

    pub async fn settled(&self) {
        tokio::join!(
            self.kpis.settled(),
            self.pipeline.settled(),
            self.stages.settled()
        );
    }

    pub fn kpis(&self) -> &Resource<KpiSummary> {
        &self.kpis
    }

    pub fn pipeline(&self) -> &Resource<Vec<PipelineData>> {
        &self.pipeline
    }

    pub fn stages(&self) -> &Resource<Vec<StageData>> {
        &self.stages
    }

    pub fn render(&self) -> String {
        views::render_dashboard(
            &self.kpis.snapshot(),
            &self.pipeline.snapshot(),
            &self.stages.snapshot(),
        )
    }
}

/// Filter bar, table and pager. Every filter change refetches the listing.
pub struct OpportunityTablePage {
    filters: watch::Sender<OpportunityFilters>,
    listing: Resource<OpportunityListResponse>,
    _follower: JoinHandle<()>,
}

impl OpportunityTablePage {
    pub fn mount(api: Arc<dyn DashboardApi>, filters: OpportunityFilters) -> Self {
        let (tx, rx) = watch::channel(filters);
        let listing = Resource::new("opportunities");

        let follower = listing.follow(rx, move |filters: OpportunityFilters| {
            let api = Arc::clone(&api);
            async move {
                let query = filters.to_query();
                tracing::debug!(
                    stage = ?query.stage,
                    sort_by = %query.sort_by,
                    offset = query.offset,
                    "Fetching opportunities"
                );
                api.opportunities(&query).await
            }
        });

        Self {
            filters: tx,
            listing,
            _follower: follower,
        }
    }

    pub fn filters(&self) -> OpportunityFilters {
        self.filters.borrow().clone()
    }

    pub fn listing(&self) -> &Resource<OpportunityListResponse> {
        &self.listing
    }

    /// Apply a filter change. When it changes anything, returns once the
    /// refetch has started.
    pub async fn update(&self, change: impl FnOnce(&mut OpportunityFilters)) -> bool {
        let generation = self.listing.generation();

        let changed = self.filters.send_if_modified(|filters| {
            let before = filters.clone();
            change(filters);
            *filters != before
        });

        if changed {
            self.listing.started_after(generation).await;
        }
        changed
    }

    pub async fn set_stage(&self, stage: StageFilter) -> bool {
        self.update(|f| f.set_stage(stage)).await
    }

    pub async fn set_sort_by(&self, field: SortField) -> bool {
        self.update(|f| f.set_sort_by(field)).await
    }

    pub async fn set_min_amount(&self, text: &str) -> bool {
        self.update(|f| f.set_min_amount(text)).await
    }

    /// Go to the next page when the last listing says there is one
    pub async fn next_page(&self) -> bool {
        let total = self
            .listing
            .snapshot()
            .data
            .map(|page| page.total)
            .unwrap_or(0);
        self.update(|f| {
            f.next_page(total);
        })
        .await
    }

    pub async fn previous_page(&self) -> bool {
        self.update(|f| {
            f.previous_page();
        })
        .await
    }

    pub async fn settled(&self) {
        self.listing.settled().await;
    }

    pub fn render(&self) -> String {
        views::render_opportunities(&self.filters(), &self.listing.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::filters::OpportunityQuery;
    use crate::models::{AuthStatus, KpiMetric, Opportunity};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory backend; listing latency depends on the requested stage.
    #[derive(Default)]
    struct FakeApi {
        authenticated: bool,
        fail_status: bool,
        data_calls: AtomicUsize,
    }

    impl FakeApi {
        fn signed_in() -> Self {
            Self {
                authenticated: true,
                ..Self::default()
            }
        }

        fn record(stage: &str, amount: f64) -> Opportunity {
            Opportunity {
                id: format!("006-{}", stage),
                name: format!("{} deal", stage),
                stage_name: stage.to_string(),
                amount: Some(amount),
                close_date: None,
                probability: None,
                owner: Some("Sarah Johnson".to_string()),
                account: Some("Acme Corp".to_string()),
                opportunity_type: None,
            }
        }
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        fn login_url(&self) -> String {
            "http://backend.test/auth/login".to_string()
        }

        async fn auth_status(&self) -> Result<AuthStatus, ClientError> {
            if self.fail_status {
                return Err(ClientError::Unavailable);
            }
            Ok(AuthStatus {
                authenticated: self.authenticated,
            })
        }

        async fn kpis(&self) -> Result<KpiSummary, ClientError> {
            self.data_calls.fetch_add(1, Ordering::SeqCst);
            Ok(KpiSummary {
                open: KpiMetric { count: 12, total: 480_000.0, average: Some(40_000.0) },
                won: KpiMetric { count: 3, total: 90_000.0, average: None },
                lost: KpiMetric { count: 1, total: 1234.5, average: None },
            })
        }

        async fn stages(&self) -> Result<Vec<StageData>, ClientError> {
            self.data_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn pipeline(&self, _months: u32) -> Result<Vec<PipelineData>, ClientError> {
            self.data_calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Http {
                status: 500,
                message: "CRM query failed".to_string(),
            })
        }

        async fn opportunities(
            &self,
            query: &OpportunityQuery,
        ) -> Result<OpportunityListResponse, ClientError> {
            self.data_calls.fetch_add(1, Ordering::SeqCst);
            let stage = query.stage.clone().unwrap_or_else(|| "Any".to_string());
            if stage == "Prospecting" {
                tokio::time::sleep(Duration::from_millis(150)).await;
            }
            Ok(OpportunityListResponse {
                records: vec![Self::record(&stage, 52_000.0)],
                total: 60,
                limit: query.limit,
                offset: query.offset,
            })
        }
    }

    #[tokio::test]
    async fn test_signed_out_gets_login_only() {
        let api = Arc::new(FakeApi::default());
        let mut app = App::new(api.clone(), DashboardConfig::default());

        assert!(matches!(app.open(Route::Dashboard), Screen::Loading));
        assert_eq!(app.check_auth().await, AuthState::Unauthenticated);

        let text = app.render(Route::Dashboard).await;
        assert!(text.contains("Login with Salesforce"));
        assert!(!text.contains("Open Pipeline"));

        let text = app.render(Route::Opportunities(OpportunityFilters::new())).await;
        assert!(text.contains("http://backend.test/auth/login"));
        assert_eq!(api.data_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_status_failure_fails_closed() {
        let api = FakeApi {
            authenticated: true,
            fail_status: true,
            ..FakeApi::default()
        };
        let app = App::start(api, DashboardConfig::default()).await;
        assert_eq!(app.auth(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_dashboard_panels_fail_independently() {
        let app = App::start(FakeApi::signed_in(), DashboardConfig::default()).await;
        let text = app.render(Route::Dashboard).await;

        assert!(text.contains("[Dashboard]"));
        assert!(text.contains("$480,000"));
        assert!(text.contains("75%"));
        assert!(text.contains("! HTTP 500: CRM query failed"));
        assert!(text.contains("No open opportunities by stage"));
    }

    #[tokio::test]
    async fn test_filter_change_resets_page_and_refetches() {
        let api: Arc<dyn DashboardApi> = Arc::new(FakeApi::signed_in());
        let page = OpportunityTablePage::mount(api, OpportunityFilters::new());
        page.settled().await;

        assert!(page.next_page().await);
        page.settled().await;
        assert_eq!(page.filters().offset(), 25);
        assert!(page.render().contains("Showing 26–50 of 60"));

        assert!(page.set_stage(StageFilter::Stage("Closed Won".into())).await);
        page.settled().await;
        assert_eq!(page.filters().offset(), 0);
        assert!(page.render().contains("Closed Won deal"));

        // Same value again is not a change
        assert!(!page.set_stage(StageFilter::Stage("Closed Won".into())).await);
    }

    #[tokio::test]
    async fn test_latest_filter_wins_over_slow_response() {
        let api: Arc<dyn DashboardApi> = Arc::new(FakeApi::signed_in());
        let page = OpportunityTablePage::mount(api, OpportunityFilters::new());
        page.settled().await;

        // Prospecting is slow; Closed Won is requested after it and lands first
        page.set_stage(StageFilter::Stage("Prospecting".into())).await;
        page.set_stage(StageFilter::Stage("Closed Won".into())).await;
        page.settled().await;
        tokio::time::sleep(Duration::from_millis(250)).await;

        let listing = page.listing().snapshot();
        let records = listing.data.unwrap().records;
        assert_eq!(records[0].stage_name, "Closed Won");
    }
}
