use chrono::Utc;
use leptos::prelude::*;

use crate::announcement::{dismiss, is_visible};
use crate::content::{Announcement, AnnouncementKind};
use crate::storage::LocalStore;

use super::SiteContext;

fn kind_class(kind: AnnouncementKind) -> &'static str {
    match kind {
        AnnouncementKind::Info => "bg-blue-600/90 border-blue-400",
        AnnouncementKind::Warning => "bg-yellow-500/90 border-yellow-300 text-black",
        AnnouncementKind::Error => "bg-red-600/90 border-red-400",
        AnnouncementKind::Success => "bg-green-600/90 border-green-400",
        AnnouncementKind::Brand => {
            "bg-gradient-to-r from-pink-500 via-purple-500 to-indigo-500 border-pink-300"
        }
    }
}

#[component]
pub fn AnnouncementBanner() -> impl IntoView {
    let ctx = expect_context::<SiteContext>();
    let announcement = ctx
        .settings_state()
        .settings()
        .and_then(|s| s.announcement.clone());
    let visible = RwSignal::new(is_visible(announcement.as_ref(), Utc::now(), &LocalStore));

    move || {
        let a: Announcement = announcement.clone().filter(|_| visible.get())?;
        let class = format!(
            "fixed inset-x-0 top-24 z-40 mx-auto w-[calc(100%-2rem)] max-w-3xl rounded-xl border px-4 py-3 text-sm text-white shadow-lg flex items-center justify-between gap-4 {}",
            kind_class(a.kind)
        );
        let text = a.text.clone();
        let link = a.link.clone();
        let dismiss_button = a.closable.then(|| {
            view! {
                <button
                    class="rounded-md px-2 py-1 hover:bg-white/20"
                    aria-label="Dismiss announcement"
                    on:click=move |_| {
                        dismiss(&a, &LocalStore);
                        visible.set(false);
                    }
                >
                    "✕"
                </button>
            }
        });
        Some(view! {
            <div role="status" class=class>
                <p class="flex-1">
                    {text}
                    {link.map(|href| {
                        view! {
                            <a
                                href=href
                                target="_blank"
                                rel="noopener noreferrer"
                                class="ml-2 font-semibold underline"
                            >
                                "Learn more"
                            </a>
                        }
                    })}
                </p>
                {dismiss_button}
            </div>
        })
    }
}
