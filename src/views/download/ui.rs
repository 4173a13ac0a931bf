use dioxus::prelude::*;
use dioxus_free_icons::{
    icons::fa_solid_icons::{FaCircleInfo, FaDownload, FaGear},
    Icon,
};

use crate::common::Toaster;
use crate::components::DownloadProgress;
use crate::server::download::{
    get_default_directory, FileEntry, MediaType, Quality, SessionId, TrackedDownload, VideoInfo,
};
use crate::views::download::handlers::{fetch_info, refresh_files, refresh_jobs, start};
use crate::views::download::platforms::sleep_ms;
use crate::views::download::types::{DownloadForm, POLL_INTERVAL_MS};
use crate::views::downloads::FileList;
use crate::views::getinfo::VideoInfoCard;

#[component]
pub fn Download() -> Element {
    let session = use_context::<Signal<Option<SessionId>>>();

    // Form state
    let mut url = use_signal(String::new);
    let mut media_type = use_signal(|| MediaType::Video);
    let mut quality = use_signal(|| Quality::Best);
    let mut directory = use_signal(String::new);

    // UI state
    let toast = use_signal(|| None::<Toaster>);
    let info = use_signal(|| None::<VideoInfo>);
    let fetching_info = use_signal(|| false);

    // Tracked downloads and finished files
    let jobs = use_signal(Vec::<TrackedDownload>::new);
    let files = use_signal(Vec::<FileEntry>::new);
    let files_error = use_signal(|| None::<String>);
    let mut polling = use_signal(|| false);

    // Fill in the server's default directory
    use_effect(move || {
        spawn(async move {
            match get_default_directory().await {
                Ok(dir) => {
                    directory.set(dir.clone());
                    refresh_files(dir, files, files_error).await;
                }
                Err(e) => tracing::warn!("Could not load default directory: {}", e),
            }
        });
    });

    // Pick up downloads this session already has once the handle arrives
    use_effect(move || {
        if let Some(id) = session() {
            spawn(async move {
                if refresh_jobs(id, jobs).await {
                    polling.set(true);
                }
            });
        }
    });

    // Poll while anything is still running
    use_future(move || async move {
        loop {
            sleep_ms(POLL_INTERVAL_MS).await;
            if !*polling.peek() {
                continue;
            }
            let Some(id) = session.peek().clone() else {
                continue;
            };

            let still_active = refresh_jobs(id, jobs).await;
            refresh_files(directory.peek().clone(), files, files_error).await;
            if !still_active {
                polling.set(false);
            }
        }
    });

    let handle_fetch_info = move |_| {
        spawn(async move {
            fetch_info(url(), info, toast, fetching_info).await;
        });
    };

    let handle_download = move |_| {
        let form = DownloadForm {
            url: url(),
            media_type: media_type(),
            quality: quality(),
            directory: directory(),
        };
        spawn(async move {
            start(session(), form, toast, polling, jobs).await;
        });
    };

    let reload_files = move |_| {
        spawn(async move {
            refresh_files(directory(), files, files_error).await;
        });
    };

    let has_url = !url().trim().is_empty();
    let info_button_text = if fetching_info() {
        "Loading info..."
    } else {
        "Fetch info"
    };

    rsx! {
        div { class: "layout",
            // Settings sidebar
            aside { class: "card sidebar",
                h2 {
                    Icon { icon: FaGear, width: 16, height: 16 }
                    " Settings"
                }

                label { class: "label", "Download type" }
                div { class: "radio-group",
                    for kind in [MediaType::Video, MediaType::Audio] {
                        label { key: "{kind.label()}", class: "radio",
                            input {
                                r#type: "radio",
                                name: "media-type",
                                checked: media_type() == kind,
                                onchange: move |_| media_type.set(kind),
                            }
                            " {kind.label()}"
                        }
                    }
                }

                label { class: "label", "Video quality" }
                select {
                    class: "input",
                    disabled: media_type() == MediaType::Audio,
                    onchange: move |evt| {
                        if let Some(selected) = Quality::from_key(&evt.value()) {
                            quality.set(selected);
                        }
                    },
                    for choice in Quality::ALL {
                        option {
                            key: "{choice.key()}",
                            value: "{choice.key()}",
                            selected: quality() == choice,
                            "{choice.label()}"
                        }
                    }
                }
                if media_type() == MediaType::Audio {
                    p { class: "muted", "Audio is saved as 192 kbps MP3." }
                }

                label { class: "label", "Download folder" }
                input {
                    class: "input",
                    r#type: "text",
                    value: "{directory}",
                    placeholder: "./downloads",
                    oninput: move |evt| directory.set(evt.value()),
                }
                p { class: "muted", "Folder on the server where files are saved." }
            }

            // URL form and video info
            section { class: "card main-column",
                h2 { "Video URL" }
                input {
                    class: "input",
                    r#type: "text",
                    value: "{url}",
                    placeholder: "https://www.youtube.com/watch?v=...",
                    oninput: move |evt| url.set(evt.value()),
                }
                div { class: "row",
                    button {
                        class: "btn btn-secondary",
                        disabled: !has_url || fetching_info(),
                        onclick: handle_fetch_info,
                        Icon { icon: FaCircleInfo, width: 14, height: 14 }
                        " {info_button_text}"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: !has_url,
                        onclick: handle_download,
                        Icon { icon: FaDownload, width: 14, height: 14 }
                        " Start download"
                    }
                }

                if let Some(notice) = toast() {
                    p { class: "{notice.class()}", "{notice.message()}" }
                }

                if let Some(found) = info() {
                    VideoInfoCard { info: found }
                }
            }

            // Download status
            section { class: "card status-column",
                h2 { "Download status" }
                if jobs().is_empty() {
                    p { class: "muted", "Nothing downloading yet." }
                }
                for entry in jobs() {
                    DownloadProgress { key: "{entry.url}", entry: entry.clone() }
                }
            }
        }

        section { class: "card",
            div { class: "row spread",
                h2 { "Downloaded files" }
                button { class: "btn btn-small", onclick: reload_files, "Refresh" }
            }
            if let Some(message) = files_error() {
                p { class: "toast toast-error", "{message}" }
            }
            FileList { directory: directory(), files: files(), toast: toast }
        }
    }
}
