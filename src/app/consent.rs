use codee::string::FromToStringCodec;
use leptos::prelude::*;
use leptos_use::storage::use_local_storage;

use crate::session::{CookieConsent, CONSENT_KEY};

use super::SiteContext;

#[component]
pub fn CookieBanner() -> impl IntoView {
    let ctx = expect_context::<SiteContext>();
    let (consent, set_consent, _) =
        use_local_storage::<CookieConsent, FromToStringCodec>(CONSENT_KEY);

    view! {
        <Show when=move || ctx.hydrated.get() && consent.get() == CookieConsent::Unset>
            <div class="fixed inset-x-0 bottom-0 z-50 p-4">
                <div class="mx-auto flex max-w-3xl flex-col gap-4 rounded-xl border border-white/20 bg-black/90 p-4 text-sm text-white shadow-lg backdrop-blur-xl sm:flex-row sm:items-center">
                    <p class="flex-1 text-white/80">
                        "This site stores a few preferences in your browser and loads a CAPTCHA on the contact page. Is that okay with you?"
                    </p>
                    <div class="flex gap-2">
                        <button
                            class="rounded-lg border border-white/30 px-4 py-2 hover:bg-white/10"
                            on:click=move |_| set_consent.set(CookieConsent::Declined)
                        >
                            "Decline"
                        </button>
                        <button
                            class="rounded-lg bg-gradient-to-r from-pink-500 to-indigo-500 px-4 py-2 font-semibold"
                            on:click=move |_| set_consent.set(CookieConsent::Accepted)
                        >
                            "Accept"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
