use dioxus::prelude::*;
use dioxus_free_icons::{
    icons::fa_solid_icons::{FaCircleCheck, FaCircleExclamation, FaSpinner},
    Icon,
};

use crate::server::download::{truncate_url, JobState, TrackedDownload};

const URL_DISPLAY_CHARS: usize = 50;

/// One row of the download status list
#[component]
pub fn DownloadProgress(entry: TrackedDownload) -> Element {
    let record = &entry.record;
    let url = truncate_url(&entry.url, URL_DISPLAY_CHARS);
    let percent = record.percent;
    let filename = record.display_filename();

    let status_class = match record.state {
        JobState::Completed => "status status-done",
        JobState::Failed => "status status-failed",
        JobState::Queued | JobState::Running => "status",
    };

    rsx! {
        div { class: "progress-card",
            div { class: "progress-header",
                match record.state {
                    JobState::Completed => rsx! {
                        Icon { icon: FaCircleCheck, width: 14, height: 14, class: "icon-done" }
                    },
                    JobState::Failed => rsx! {
                        Icon { icon: FaCircleExclamation, width: 14, height: 14, class: "icon-failed" }
                    },
                    JobState::Queued | JobState::Running => rsx! {
                        Icon { icon: FaSpinner, width: 14, height: 14, class: "icon-busy" }
                    },
                }
                span { class: "progress-url", title: "{entry.url}", "{url}" }
            }
            p { class: "{status_class}", "{record.status}" }

            if percent > 0 {
                div { class: "progress-track",
                    div { class: "progress-fill", style: "width: {percent}%" }
                }
                p { class: "muted", "Progress: {percent}%" }
            }

            if let Some(name) = filename {
                p { class: "progress-file", "File: {name}" }
            }
        }
    }
}
