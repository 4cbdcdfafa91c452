use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_navigate;

use crate::session::{LoginNotice, LOGIN_ERROR_CLEAR_DELAY};

use super::SiteContext;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<SiteContext>();
    let (password, set_password) = signal(String::new());
    let notice = RwSignal::new(LoginNotice::default());
    let clear_timer = StoredValue::new(None::<TimeoutHandle>);
    let navigate = use_navigate();

    on_cleanup(move || {
        if let Some(handle) = clear_timer.try_get_value().flatten() {
            handle.clear();
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let configured = ctx
            .settings_state()
            .settings()
            .and_then(|s| s.admin_password.clone());
        match ctx.admin.login(&password.get_untracked(), configured.as_deref()) {
            Ok(()) => navigate("/", Default::default()),
            Err(e) => {
                set_password.set(String::new());
                let Some(ticket) = notice.try_update(|n| n.show(e.to_string())) else {
                    return;
                };
                if let Some(previous) = clear_timer.get_value() {
                    previous.clear();
                }
                let expire = move || {
                    notice.try_update(|n| n.expire(ticket));
                };
                match set_timeout_with_handle(expire, LOGIN_ERROR_CLEAR_DELAY) {
                    Ok(handle) => clear_timer.set_value(Some(handle)),
                    Err(e) => log::warn!("couldn't schedule login error clear: {e:?}"),
                }
            }
        }
    };

    view! {
        <Title text="Admin Login" />
        <div class="flex min-h-screen items-center justify-center bg-gradient-to-br from-purple-900 via-black to-indigo-900 px-4 text-white">
            <form
                class="w-full max-w-sm space-y-4 rounded-xl border border-white/20 bg-black/70 p-8 shadow-lg backdrop-blur-xl"
                on:submit=on_submit
            >
                <h1 class="text-2xl font-bold">"Admin Login"</h1>
                <input
                    type="password"
                    placeholder="Password"
                    autocomplete="current-password"
                    class="w-full rounded-lg bg-white/10 px-4 py-2 focus:outline-none focus:ring-2 focus:ring-pink-400"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                {move || {
                    notice
                        .with(|n| n.message().map(str::to_string))
                        .map(|msg| view! { <p class="text-sm text-red-400">{msg}</p> })
                }}
                <button
                    type="submit"
                    class="w-full rounded-xl bg-gradient-to-r from-pink-500 via-purple-500 to-indigo-500 px-6 py-3 text-sm font-semibold shadow-lg transition-all duration-300 hover:scale-105"
                >
                    "Login"
                </button>
            </form>
        </div>
    }
}
