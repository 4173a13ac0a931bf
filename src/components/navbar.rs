use crate::Route;
use dioxus::prelude::*;
use dioxus_free_icons::{
    icons::fa_solid_icons::{FaDownload, FaFolderOpen},
    Icon,
};

#[component]
pub fn Navbar() -> Element {
    // Get current path to highlight active link
    let route = use_route::<Route>();
    let is_download = matches!(route, Route::Download {});
    let is_downloads = matches!(route, Route::Downloads {});
    let download_class = if is_download { "nav-link active" } else { "nav-link" };
    let downloads_class = if is_downloads { "nav-link active" } else { "nav-link" };

    rsx! {
        div { class: "app-shell",
            header { class: "navbar",
                div { class: "brand",
                    span { class: "brand-mark", "▶" }
                    span { class: "brand-title", "Video Downloader" }
                }
                nav { class: "nav-links",
                    Link {
                        class: "{download_class}",
                        to: Route::Download {},
                        Icon { icon: FaDownload, width: 16, height: 16 }
                        span { "Download" }
                    }
                    Link {
                        class: "{downloads_class}",
                        to: Route::Downloads {},
                        Icon { icon: FaFolderOpen, width: 16, height: 16 }
                        span { "Files" }
                    }
                }
            }
            main { class: "content", Outlet::<Route> {} }
        }
    }
}
