//! folio - research portfolio frontend
//!
//! Mounts the portfolio page and loads the bundled record snapshot.

use folio_components::Portfolio;
use folio_state::provide_portfolio_state;
use leptos::prelude::*;

/// Records shipped with the build, in the fetching layer's snapshot format
const SNAPSHOT: &str = include_str!("../data/sample.json");

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("folio {} starting", env!("CARGO_PKG_VERSION"));

    mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    let state = provide_portfolio_state();

    if let Err(e) = state.load_json(SNAPSHOT) {
        tracing::error!("Bundled snapshot unusable: {}", e);
    }

    view! { <Portfolio /> }
}
