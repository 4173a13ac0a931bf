use dioxus::prelude::*;

use crate::server::download::{format_count, VideoInfo};

fn or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "N/A".to_string())
}

/// Metadata card shown after "Fetch info"
#[component]
pub fn VideoInfoCard(info: VideoInfo) -> Element {
    let views = info
        .view_count
        .map(format_count)
        .unwrap_or_else(|| "N/A".to_string());

    rsx! {
        div { class: "card info-card",
            h3 { "Video info" }
            div { class: "info-grid",
                div { class: "info-fields",
                    p { strong { "Title: " } "{or_na(&info.title)}" }
                    p { strong { "Uploader: " } "{or_na(&info.uploader)}" }
                    p { strong { "Duration: " } "{or_na(&info.duration)}" }
                    p { strong { "Views: " } "{views}" }
                    p { strong { "Upload date: " } "{or_na(&info.upload_date)}" }
                    p { strong { "Description: " } "{or_na(&info.description)}" }
                }
                if let Some(thumbnail) = info.thumbnail.clone() {
                    figure { class: "thumbnail",
                        img { src: "{thumbnail}", alt: "Thumbnail" }
                        figcaption { "Thumbnail" }
                    }
                }
            }
        }
    }
}
