//! Navigation Component
//!
//! Header bar with the page links and the logout button.

use leptos::*;
use leptos_router::*;

use crate::api;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let on_logout = move |_| {
        spawn_local(async move {
            if let Err(e) = api::logout().await {
                web_sys::console::error_1(&format!("Logout failed: {}", e).into());
            }
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        });
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="text-xl font-bold text-white">
                        "Sales Pipeline"
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink href="/" label="Dashboard" />
                        <NavLink href="/opportunities" label="Opportunities" />
                        <button
                            on:click=on_logout
                            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                        >
                            "Logout"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=href
            exact=true
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}
