//! Portfolio page layout

use folio_charts::{EducationChart, ExperienceChart, PublicationChart, ReputationChart};
use folio_state::{Section, use_portfolio_state};
use leptos::prelude::*;

use crate::KeywordsPanel;

#[component]
pub fn Portfolio() -> impl IntoView {
    let state = use_portfolio_state();

    view! {
        <div class="portfolio">
            <nav class="pf-nav">
                {Section::all().iter().map(|section| view! {
                    <a class="pf-nav-link" href=format!("#{}", section.anchor())>
                        {section.label()}
                    </a>
                }).collect_view()}
            </nav>

            <main class="pf-main">
                <SectionPanel section=Section::Experience>
                    <ExperienceChart experience=state.experience />
                </SectionPanel>

                <SectionPanel section=Section::Education>
                    <EducationChart educations=state.educations />
                </SectionPanel>

                <SectionPanel section=Section::Publications>
                    <PublicationChart publications=state.publications />
                </SectionPanel>

                <SectionPanel section=Section::Reputation>
                    <ReputationChart sites=state.sites weights=state.weights />
                </SectionPanel>

                <SectionPanel section=Section::Skills>
                    <KeywordsPanel keywords=state.keywords />
                </SectionPanel>
            </main>

            <footer class="pf-footer">
                <StatusBar />
            </footer>
        </div>
    }
}

/// Titled page section; empty sections are still rendered so their charts
/// keep an axed panel
#[component]
fn SectionPanel(section: Section, children: Children) -> impl IntoView {
    let state = use_portfolio_state();

    view! {
        <section class="panel" id=section.anchor()>
            <div class="panel-header">
                <span class="panel-title">{section.label()}</span>
                {move || (!state.has_content(section)).then(|| view! {
                    <span class="panel-empty">"no records"</span>
                })}
            </div>
            <div class="panel-content">
                {children()}
            </div>
        </section>
    }
}

#[component]
fn StatusBar() -> impl IntoView {
    let state = use_portfolio_state();
    let error = state.error;
    let loading = state.loading;

    view! {
        <div class="status-bar">
            {move || loading.get().then(|| view! {
                <span class="sb-loading">"Loading\u{2026}"</span>
            })}

            {move || {
                error.get().map(|e| {
                    view! {
                        <div class="sb-error">
                            <span class="error-icon">"⚠"</span>
                            <span class="error-msg">{e}</span>
                        </div>
                    }
                })
            }}

            <div class="sb-version">
                <span>{concat!("v", env!("CARGO_PKG_VERSION"))}</span>
            </div>
        </div>
    }
}
