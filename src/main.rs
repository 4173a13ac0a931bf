#![recursion_limit = "256"]

use dioxus::prelude::*;

use components::Navbar;
use server::download::{open_session, SessionId};
use views::{Download, Downloads};

mod components;
mod server;
mod views;

// Add the common module to the root
pub mod common;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Navbar)]
    #[route("/")]
    Download {},
    #[route("/downloads")]
    Downloads {},
}

const MAIN_CSS: Asset = asset!("/assets/styling/main.css");

fn main() {
    if let Err(e) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("Logger initialization error: {}", e);
    }

    #[cfg(feature = "server")]
    {
        let state = server::download::services::init_app_state();
        tracing::info!(
            "Downloads go to {} by default",
            state.config.default_download_dir.display()
        );
    }

    LaunchBuilder::new().launch(App);
}

#[component]
fn App() -> Element {
    // One session per open page; every view reaches it through context
    let mut session = use_context_provider(|| Signal::new(None::<SessionId>));

    use_effect(move || {
        spawn(async move {
            match open_session().await {
                Ok(id) => session.set(Some(id)),
                Err(e) => tracing::error!("Could not open a session: {}", e),
            }
        });
    });

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        Router::<Route> {}
    }
}
