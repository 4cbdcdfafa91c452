use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

use crate::content::{skill_icon_url, Project};

use super::{get_projects, SiteContext};

const ABOUT_PLACEHOLDER: &str = "Hi! I'm 2BDeV, a passionate web developer. I love building modern and visually appealing websites.";

const CONTAINER: &str = "mx-auto w-full max-w-7xl px-4 sm:px-6 lg:px-8";

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = expect_context::<SiteContext>();
    let settings = ctx.settings_state().settings().cloned().unwrap_or_default();
    let about = settings
        .about_text
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| ABOUT_PLACEHOLDER.to_string());
    let skills = settings.skills;

    view! {
        <Title text="Home" />
        <Hero />
        <section id="about" class="relative py-24 text-white bg-gradient-to-b from-transparent to-black/30">
            <div class=CONTAINER>
                <h2 class="text-4xl font-bold mb-6">"About"</h2>
                <p class="text-white/80 max-w-3xl whitespace-pre-line">{about}</p>
            </div>
        </section>
        <Projects />
        <section id="skills" class="relative py-24 text-white bg-gradient-to-b from-transparent to-black/30">
            <div class=CONTAINER>
                <h2 class="text-4xl font-bold mb-6">"Skills"</h2>
                <div class="grid grid-cols-3 sm:grid-cols-4 lg:grid-cols-6 gap-6">
                    {skills
                        .into_iter()
                        .map(|skill| {
                            view! {
                                <div class="flex flex-col items-center">
                                    <img
                                        src=skill_icon_url(&skill)
                                        alt=skill.clone()
                                        class="h-12 w-12"
                                        loading="lazy"
                                    />
                                    <span class="mt-2 text-sm">{skill}</span>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </section>
        <section class="relative py-24 text-white">
            <div class=CONTAINER>
                <div class="flex flex-col items-center text-center">
                    <h2 class="text-4xl font-bold mb-6">"Let's work together"</h2>
                    <p class="mb-8 text-white/80 max-w-xl">
                        "Have a project in mind or just want to say hi? My inbox is open."
                    </p>
                    <A
                        href="/contact"
                        attr:class="rounded-xl bg-gradient-to-r from-pink-500 via-purple-500 to-indigo-500 px-6 py-3 text-sm font-semibold text-white shadow-lg transition-all duration-300 hover:scale-105"
                    >
                        "Contact Me →"
                    </A>
                </div>
            </div>
        </section>
    }
}

#[component]
fn Hero() -> impl IntoView {
    view! {
        <section class="relative isolate overflow-hidden pt-16 text-white">
            <div class=CONTAINER>
                <div class="grid items-center gap-10 md:grid-cols-2">
                    <div>
                        <h1 class="mt-6 text-5xl font-extrabold leading-tight tracking-tight sm:text-6xl">
                            "Hi, I'm "
                            <span class="bg-gradient-to-r from-pink-400 via-fuchsia-500 to-indigo-500 bg-clip-text text-transparent">
                                "2BDeV"
                            </span>
                            "."
                            <br />
                            "Web Developer & Creative Problem Solver."
                        </h1>
                        <p class="mt-4 text-white/80 max-w-xl">
                            "I create modern, responsive websites and applications. I love simple yet effective solutions."
                        </p>
                        <div class="mt-8 flex flex-wrap items-center gap-3">
                            <A
                                href="/contact"
                                attr:class="rounded-xl bg-gradient-to-r from-pink-500 via-purple-500 to-indigo-500 px-6 py-3 text-sm font-semibold text-white shadow-lg transition-all duration-300 hover:scale-105"
                            >
                                "Contact Me"
                            </A>
                            <a
                                href="https://github.com/2BDeV"
                                target="_blank"
                                rel="noopener noreferrer"
                                class="rounded-xl border border-white/30 px-6 py-3 text-sm font-semibold text-white/90 backdrop-blur transition-all duration-300 hover:border-white/50 hover:bg-white/5"
                            >
                                "View My Work"
                            </a>
                        </div>
                    </div>
                    <div class="relative flex justify-center">
                        <div class="relative w-80 h-80 rounded-full bg-gradient-to-tr from-pink-500 via-fuchsia-600 to-indigo-700 shadow-2xl animate-spin-slow">
                            <img
                                src="/2bdev-logo.svg"
                                alt="2BDeV logo"
                                class="absolute inset-0 m-auto w-44 drop-shadow-xl"
                            />
                        </div>
                    </div>
                </div>
            </div>
        </section>
    }
}

#[component]
fn Projects() -> impl IntoView {
    let projects = Resource::new(|| (), |_| get_projects());

    view! {
        <section id="projects" class="relative py-24 text-white bg-gradient-to-b from-black/30 to-transparent">
            <div class=CONTAINER>
                <h2 class="text-4xl font-bold mb-6">"Projects"</h2>
                <Transition fallback=move || {
                    view! {
                        <div class="grid gap-8 sm:grid-cols-2 lg:grid-cols-3">
                            <div class="h-32 rounded-xl bg-white/10 animate-pulse"></div>
                            <div class="h-32 rounded-xl bg-white/10 animate-pulse"></div>
                            <div class="h-32 rounded-xl bg-white/10 animate-pulse"></div>
                        </div>
                    }
                }>
                    {move || Suspend::new(async move {
                        match projects.await {
                            Err(e) => {
                                log::warn!("couldn't load projects: {e}");
                                view! { <p class="text-white/70">"Projects couldn't be loaded right now."</p> }
                                    .into_any()
                            }
                            Ok(list) if list.is_empty() => {
                                view! { <p class="text-white/70">"No projects yet. Check back soon!"</p> }
                                    .into_any()
                            }
                            Ok(list) => {
                                view! {
                                    <div class="grid gap-8 sm:grid-cols-2 lg:grid-cols-3">
                                        {list.into_iter().map(project_card).collect_view()}
                                    </div>
                                }
                                    .into_any()
                            }
                        }
                    })}
                </Transition>
            </div>
        </section>
    }
}

fn project_card(project: Project) -> impl IntoView {
    let body = view! {
        <h3 class="text-xl font-semibold relative z-10">{project.title}</h3>
        <p class="mt-2 text-sm text-white/70 relative z-10">{project.description}</p>
    };
    let class = "group block rounded-xl bg-gradient-to-tr from-pink-500/20 to-purple-600/20 p-6 shadow-lg transition-transform duration-300 hover:scale-105 relative overflow-hidden";
    match project.link {
        Some(href) => {
            view! {
                <a href=href target="_blank" rel="noopener noreferrer" class=class>
                    {body}
                </a>
            }
                .into_any()
        }
        None => view! { <div class=class>{body}</div> }.into_any(),
    }
}
