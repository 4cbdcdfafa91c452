use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::{components::Outlet, hooks::use_location};

use crate::gate::{decide_view, maintenance_content, GateView, MaintenanceContent, SettingsState};

use super::announcement::AnnouncementBanner;
use super::header::Header;
use super::{settings_state, Footer, SiteContext};

/// Parent of every route. Picks between the loading screen, the maintenance
/// page, a bare child route and the full layout.
#[component]
pub fn Gate() -> impl IntoView {
    let ctx = expect_context::<SiteContext>();
    let location = use_location();

    view! {
        <Suspense fallback=|| view! { <Loading /> }>
            {move || {
                let hydrated = ctx.hydrated.get();
                let is_admin = ctx.admin.is_admin();
                let path = location.pathname.get();
                Suspend::new(async move {
                    // Awaited even before hydration so the server serializes it.
                    let state = settings_state(Some(ctx.settings.await));
                    if !hydrated {
                        return view! { <Loading /> }.into_any();
                    }
                    match decide_view(&state, is_admin, &path) {
                        GateView::Loading => view! { <Loading /> }.into_any(),
                        GateView::Maintenance => view! { <Maintenance state /> }.into_any(),
                        GateView::AdminLogin => view! { <Outlet /> }.into_any(),
                        GateView::Main => {
                            view! {
                                <div class="relative overflow-hidden min-h-screen flex flex-col">
                                    <Background />
                                    <Header />
                                    <AnnouncementBanner />
                                    <main class="flex-grow pt-28">
                                        <Outlet />
                                    </main>
                                    <Footer />
                                </div>
                            }
                                .into_any()
                        }
                    }
                })
            }}
        </Suspense>
    }
}

#[component]
fn Loading() -> impl IntoView {
    view! {
        <div class="flex min-h-screen items-center justify-center bg-black">
            <div class="h-12 w-12 rounded-full border-4 border-pink-500 border-t-transparent animate-spin"></div>
        </div>
    }
}

#[component]
fn Background() -> impl IntoView {
    view! {
        <div class="fixed inset-0 -z-10">
            <div class="absolute inset-0 bg-gradient-to-br from-purple-900 via-black to-indigo-900 animate-gradient-slow"></div>
            <div class="absolute -top-40 -left-40 h-96 w-96 rounded-full bg-pink-500 opacity-30 blur-3xl animate-pulse"></div>
            <div class="absolute top-60 -right-40 h-96 w-96 rounded-full bg-indigo-500 opacity-30 blur-3xl animate-pulse"></div>
        </div>
    }
}

#[component]
fn Maintenance(state: SettingsState) -> impl IntoView {
    let content = state
        .settings()
        .map(maintenance_content)
        .unwrap_or_else(|| maintenance_content(&Default::default()));

    view! {
        <Title text="Maintenance" />
        {match content {
            MaintenanceContent::Html(html) => {
                view! { <div class="min-h-screen" inner_html=html></div> }.into_any()
            }
            MaintenanceContent::Message(message) => {
                view! {
                    <div class="flex min-h-screen flex-col items-center justify-center bg-gradient-to-br from-purple-900 via-black to-indigo-900 px-6 text-center text-white">
                        <h1 class="text-4xl font-extrabold tracking-tight sm:text-5xl">
                            "Under Maintenance"
                        </h1>
                        <p class="mt-6 max-w-xl text-white/80">{message}</p>
                    </div>
                }
                    .into_any()
            }
        }}
    }
}
