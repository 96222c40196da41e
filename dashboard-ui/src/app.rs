//! App Root Component
//!
//! Auth gate around the router. The session status is checked once on mount;
//! until it answers only a spinner shows, and a signed-out session only ever
//! sees the login prompt.

use leptos::*;
use leptos_router::*;

use pipeline_dashboard::auth::AuthState;

use crate::api;
use crate::components::{Loading, Nav};
use crate::pages::{Dashboard, Login, Opportunities};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let auth = create_rw_signal(AuthState::Unknown);

    spawn_local(async move {
        let result = api::fetch_auth_status().await;
        if let Err(e) = &result {
            web_sys::console::warn_1(&format!("Auth status check failed: {}", e).into());
        }
        auth.set(AuthState::resolve(result));
    });

    view! {
        <div class="min-h-screen bg-gray-900 text-white">
            {move || match auth.get() {
                AuthState::Unknown => view! { <Loading /> }.into_view(),
                AuthState::Unauthenticated => view! { <Login /> }.into_view(),
                AuthState::Authenticated => view! { <Shell /> }.into_view(),
            }}
        </div>
    }
}

/// Nav bar and routes of a signed-in session
#[component]
fn Shell() -> impl IntoView {
    view! {
        <Router>
            <Nav />
            <main class="container mx-auto px-4 py-8">
                <Routes>
                    <Route path="/" view=Dashboard />
                    <Route path="/opportunities" view=Opportunities />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </main>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
