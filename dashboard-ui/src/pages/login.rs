//! Login Page

use leptos::*;

use pipeline_dashboard::auth::{LOGIN_BUTTON, LOGIN_MESSAGE, LOGIN_TITLE};

use crate::api;

/// Sign-in prompt; the button hands the window to the backend's OAuth entry point
#[component]
pub fn Login() -> impl IntoView {
    let on_login = move |_| {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(&api::login_url()) {
                web_sys::console::error_1(&e);
            }
        }
    };

    view! {
        <div class="flex flex-col items-center justify-center min-h-screen text-center">
            <h1 class="text-3xl font-bold mb-2">{LOGIN_TITLE}</h1>
            <p class="text-gray-400 mb-6">{LOGIN_MESSAGE}</p>
            <button
                on:click=on_login
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                {LOGIN_BUTTON}
            </button>
        </div>
    }
}
