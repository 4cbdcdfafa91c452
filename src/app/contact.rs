use chrono::Utc;
use leptos::{prelude::*, task::spawn_local};
use leptos_meta::{Script, Title};

use crate::contact::{ContactError, ContactForm, Field, SubmissionState};

use super::{get_client_config, submit_contact};

const TURNSTILE_SCRIPT: &str = "https://challenges.cloudflare.com/turnstile/v0/api.js";
const TOKEN_CALLBACK: &str = "onContactCaptchaToken";
const EXPIRED_CALLBACK: &str = "onContactCaptchaExpired";

const INPUT_CLASS: &str =
    "w-full rounded-lg bg-white/10 px-4 py-2 focus:outline-none focus:ring-2 focus:ring-pink-400";

#[component]
pub fn ContactPage() -> impl IntoView {
    let form = RwSignal::new(ContactForm::default());
    let client_config = Resource::new(|| (), |_| get_client_config());

    let (mount, install) = captcha_target::attach(form);
    on_cleanup(move || captcha_target::detach(mount));
    if install {
        #[cfg(feature = "hydrate")]
        turnstile::register_callbacks(
            |token| {
                captcha_target::update(|f| f.receive_token(token, Utc::now()));
            },
            || {
                captcha_target::update(ContactForm::expire_token);
            },
        );
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let payload = match form.try_update(|f| f.begin_submit(Utc::now())) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                blocking_alert(&e);
                return;
            }
            None => return,
        };
        spawn_local(async move {
            let res = submit_contact(
                payload.name,
                payload.email,
                payload.message,
                payload.captcha_token,
            )
            .await
            .map_err(|e| ContactError::Delivery(e.to_string()));
            form.try_update(|f| f.finish(res));
            #[cfg(feature = "hydrate")]
            turnstile::reset();
        });
    };

    let field_input = move |field: Field, value: String| form.update(|f| f.edit(field, value));
    let busy = move || {
        matches!(
            form.with(ContactForm::state),
            SubmissionState::Validating | SubmissionState::AwaitingCaptcha | SubmissionState::Submitting
        )
    };

    view! {
        <Title text="Contact" />
        <Script src=TURNSTILE_SCRIPT defer="true" />
        <section id="contact" class="relative py-24 text-white">
            <div class="mx-auto w-full max-w-7xl px-4 sm:px-6 lg:px-8">
                <div class="flex flex-col items-center text-center">
                    <h1 class="text-4xl font-bold mb-6">"Contact"</h1>
                    <form class="w-full max-w-xl space-y-4" on:submit=on_submit>
                        <input
                            type="text"
                            placeholder="Name"
                            class=INPUT_CLASS
                            prop:value=move || form.with(|f| f.fields.name.clone())
                            on:input=move |ev| field_input(Field::Name, event_target_value(&ev))
                        />
                        <input
                            type="email"
                            placeholder="Email"
                            class=INPUT_CLASS
                            prop:value=move || form.with(|f| f.fields.email.clone())
                            on:input=move |ev| field_input(Field::Email, event_target_value(&ev))
                        />
                        <textarea
                            placeholder="Message"
                            rows="4"
                            class=INPUT_CLASS
                            prop:value=move || form.with(|f| f.fields.message.clone())
                            on:input=move |ev| field_input(Field::Message, event_target_value(&ev))
                        ></textarea>
                        <Suspense>
                            {move || Suspend::new(async move {
                                let site_key = client_config
                                    .await
                                    .map(|c| c.captcha_site_key)
                                    .unwrap_or_default();
                                if site_key.is_empty() {
                                    log::warn!("no CAPTCHA site key configured");
                                }
                                view! { <CaptchaWidget site_key /> }
                            })}
                        </Suspense>
                        <button
                            type="submit"
                            disabled=busy
                            class="rounded-xl bg-gradient-to-r from-pink-500 via-purple-500 to-indigo-500 px-6 py-3 text-sm font-semibold text-white shadow-lg transition-all duration-300 hover:scale-105 disabled:opacity-50"
                        >
                            {move || if busy() { "Sending..." } else { "Send" }}
                        </button>
                        {move || match form.with(ContactForm::state) {
                            SubmissionState::Sent => {
                                Some(
                                    view! {
                                        <p class="text-green-400">
                                            "Thanks! Your message is on its way."
                                        </p>
                                    }
                                        .into_any(),
                                )
                            }
                            SubmissionState::Failed => {
                                Some(
                                    view! {
                                        <p class="text-red-400">
                                            "Sorry, your message couldn't be sent. Please try again."
                                        </p>
                                    }
                                        .into_any(),
                                )
                            }
                            _ => None,
                        }}
                    </form>
                </div>
            </div>
        </section>
    }
}

#[component]
fn CaptchaWidget(site_key: String) -> impl IntoView {
    let node = NodeRef::<leptos::html::Div>::new();

    // The script renders `.cf-turnstile` elements present when it loads;
    // later mounts (client-side navigation) need an explicit render.
    #[cfg(feature = "hydrate")]
    node.on_load(turnstile::render);

    view! {
        <div
            node_ref=node
            class="cf-turnstile flex justify-center"
            data-sitekey=site_key
            data-callback=TOKEN_CALLBACK
            data-expired-callback=EXPIRED_CALLBACK
            data-theme="dark"
        ></div>
    }
}

fn blocking_alert(e: &ContactError) {
    #[cfg(feature = "hydrate")]
    if let Err(err) = window().alert_with_message(&e.to_string()) {
        log::warn!("alert failed: {err:?}");
    }
    #[cfg(not(feature = "hydrate"))]
    log::warn!("{e}");
}

/// Routes the page-global CAPTCHA callbacks to whichever contact form is
/// mounted. The globals are installed once and outlive every mount.
mod captcha_target {
    use std::cell::RefCell;

    use leptos::prelude::*;

    use crate::contact::ContactForm;

    #[derive(Default)]
    struct Target {
        installed: bool,
        mount: u64,
        form: Option<RwSignal<ContactForm>>,
    }

    thread_local! {
        static TARGET: RefCell<Target> = RefCell::default();
    }

    /// Points the callbacks at `form`. Returns the mount id for [`detach`]
    /// and whether the globals still need installing.
    pub fn attach(form: RwSignal<ContactForm>) -> (u64, bool) {
        TARGET.with_borrow_mut(|t| {
            t.mount += 1;
            t.form = Some(form);
            let install = !t.installed;
            t.installed = true;
            (t.mount, install)
        })
    }

    /// No-op once a later mount has attached.
    pub fn detach(mount: u64) {
        TARGET.with_borrow_mut(|t| {
            if t.mount == mount {
                t.form = None;
            }
        });
    }

    pub fn update<U>(f: impl FnOnce(&mut ContactForm) -> U) -> Option<U> {
        let form = TARGET.with_borrow(|t| t.form);
        form.and_then(|form| form.try_update(f))
    }
}

#[cfg(feature = "hydrate")]
mod turnstile {
    use js_sys::{Function, Reflect};
    use wasm_bindgen::{prelude::*, JsCast};

    use super::{EXPIRED_CALLBACK, TOKEN_CALLBACK};

    /// Exposes the widget callbacks as globals named in the widget's `data-*`
    /// attributes. Call once per page; the closures are never freed.
    pub fn register_callbacks(on_token: impl Fn(String) + 'static, on_expired: impl Fn() + 'static) {
        let window = leptos::prelude::window();
        let on_token = Closure::<dyn Fn(String)>::new(on_token);
        let on_expired = Closure::<dyn Fn()>::new(on_expired);
        for (name, callback) in [
            (TOKEN_CALLBACK, on_token.as_ref()),
            (EXPIRED_CALLBACK, on_expired.as_ref()),
        ] {
            if Reflect::set(&window, &JsValue::from_str(name), callback).is_err() {
                log::error!("couldn't register {name}");
            }
        }
        // Owned by the page from here on.
        on_token.forget();
        on_expired.forget();
    }

    fn call(method: &str, arg: Option<&JsValue>) {
        let window = leptos::prelude::window();
        let Ok(api) = Reflect::get(&window, &JsValue::from_str("turnstile")) else {
            return;
        };
        if api.is_undefined() {
            // script not loaded yet
            return;
        }
        let Ok(func) = Reflect::get(&api, &JsValue::from_str(method))
            .and_then(|f| f.dyn_into::<Function>())
        else {
            log::warn!("turnstile.{method} is not a function");
            return;
        };
        let res = match arg {
            Some(arg) => func.call1(&api, arg),
            None => func.call0(&api),
        };
        if let Err(e) = res {
            log::warn!("turnstile.{method} failed: {e:?}");
        }
    }

    pub fn render(el: web_sys::HtmlDivElement) {
        if el.child_element_count() == 0 {
            let el: &JsValue = el.as_ref();
            call("render", Some(el));
        }
    }

    pub fn reset() {
        call("reset", None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captcha_callbacks_installed_once() {
        let first = RwSignal::new(ContactForm::default());
        let (first_mount, install) = captcha_target::attach(first);
        assert!(install);

        // navigating back to /contact mounts a fresh form
        let second = RwSignal::new(ContactForm::default());
        let (second_mount, install) = captcha_target::attach(second);
        assert!(!install);

        // the first mount's cleanup may run after the second attached
        captcha_target::detach(first_mount);
        assert!(captcha_target::update(|f| f.edit(Field::Name, "Ada".to_string())).is_some());
        assert_eq!(second.with(|f| f.fields.name.clone()), "Ada");
        assert!(first.with(|f| f.fields.name.is_empty()));

        captcha_target::detach(second_mount);
        assert!(captcha_target::update(|f| f.edit(Field::Name, "Bob".to_string())).is_none());
        assert_eq!(second.with(|f| f.fields.name.clone()), "Ada");

        let (_, install) = captcha_target::attach(RwSignal::new(ContactForm::default()));
        assert!(!install);
    }
}
