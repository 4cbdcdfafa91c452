use leptos::{ev, prelude::*};
use leptos_router::components::A;

use super::SiteContext;

/// Scroll offset in pixels past which the header turns solid.
const SCROLL_THRESHOLD: f64 = 50.0;

const NAV_LINKS: [(&str, &str); 4] = [
    ("/#about", "About"),
    ("/#projects", "Projects"),
    ("/#skills", "Skills"),
    ("/contact", "Contact"),
];

#[component]
pub fn Header() -> impl IntoView {
    let ctx = expect_context::<SiteContext>();
    let (scrolled, set_scrolled) = signal(false);
    let (menu_open, set_menu_open) = signal(false);

    Effect::new(move |_| {
        let handle = window_event_listener(ev::scroll, move |_| {
            let y = window().scroll_y().unwrap_or_default();
            set_scrolled.set(y > SCROLL_THRESHOLD);
        });
        on_cleanup(move || handle.remove());
    });

    let nav = move |class: &'static str| {
        NAV_LINKS
            .iter()
            .map(|(href, label)| {
                view! {
                    <a href=*href class=class on:click=move |_| set_menu_open.set(false)>
                        {*label}
                    </a>
                }
            })
            .collect_view()
    };

    let logout_button = move || {
        ctx.admin.is_admin().then(|| {
            view! {
                <button
                    class="rounded-xl border border-white/30 px-4 py-2 text-sm font-semibold hover:bg-white/10 transition"
                    on:click=move |_| logout(ctx)
                >
                    "Logout"
                </button>
            }
        })
    };

    view! {
        <header class="fixed inset-x-0 top-0 z-50">
            <div class="mx-auto w-full max-w-7xl px-4 sm:px-6 lg:px-8">
                <div class=move || {
                    let base = "mt-4 flex items-center justify-between rounded-xl border px-4 py-3 text-white shadow-lg transition-colors duration-300";
                    if scrolled.get() {
                        format!("{base} border-white/20 bg-black/90 backdrop-blur-xl")
                    } else {
                        format!("{base} border-transparent bg-transparent")
                    }
                }>
                    <A href="/" attr:class="flex items-center gap-2">
                        <div class="flex h-10 w-10 items-center justify-center rounded-lg bg-gradient-to-br from-pink-500 to-indigo-600">
                            <img src="/2bdev-logo.svg" alt="2BDeV logo" class="h-6 w-6" />
                        </div>
                        <span class="text-base font-bold tracking-tight">"2BDeV"</span>
                    </A>
                    <nav class="hidden items-center gap-6 text-sm md:flex">
                        {nav("hover:text-pink-400 transition")}
                        {logout_button}
                    </nav>
                    <button
                        class="rounded-xl p-2 hover:bg-white/10 md:hidden"
                        aria-label="Menu"
                        on:click=move |_| set_menu_open.update(|open| *open = !*open)
                    >
                        {move || if menu_open.get() { "✕" } else { "☰" }}
                    </button>
                </div>
            </div>
            <Show when=move || menu_open.get()>
                <div class="md:hidden mx-auto w-full max-w-7xl px-4 sm:px-6 lg:px-8">
                    <div class="mt-2 space-y-2 rounded-xl border border-white/20 bg-black/80 p-4 text-white backdrop-blur-xl">
                        {nav("block rounded-xl px-3 py-2 hover:bg-white/10")}
                        {logout_button}
                    </div>
                </div>
            </Show>
        </header>
    }
}

/// Drops the admin flag and reloads so no gated content survives in memory.
fn logout(ctx: SiteContext) {
    ctx.admin.logout();
    #[cfg(feature = "hydrate")]
    reload();
}

#[cfg(feature = "hydrate")]
fn reload() {
    if let Err(e) = window().location().reload() {
        log::error!("reload after logout failed: {e:?}");
    }
}
