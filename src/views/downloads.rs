use dioxus::prelude::*;
use dioxus_free_icons::{
    icons::fa_solid_icons::{FaArrowsRotate, FaFile, FaFloppyDisk},
    Icon,
};

use crate::common::Toaster;
use crate::server::download::{get_default_directory, FileEntry};
use crate::views::download::handlers::{refresh_files, save_file};

/// Files in a directory, each with a "Save" button
#[component]
pub fn FileList(directory: String, files: Vec<FileEntry>, toast: Signal<Option<Toaster>>) -> Element {
    if files.is_empty() {
        return rsx! {
            p { class: "muted", "No downloaded files yet." }
        };
    }

    rsx! {
        ul { class: "file-list",
            for file in files {
                li { key: "{file.name}", class: "file-row",
                    span { class: "file-name",
                        Icon { icon: FaFile, width: 14, height: 14 }
                        " {file.name}"
                    }
                    span { class: "file-size", "{file.display_size()}" }
                    button {
                        class: "btn btn-small",
                        onclick: {
                            let directory = directory.clone();
                            let name = file.name.clone();
                            move |_| {
                                let directory = directory.clone();
                                let name = name.clone();
                                spawn(async move {
                                    save_file(directory, name, toast).await;
                                });
                            }
                        },
                        Icon { icon: FaFloppyDisk, width: 14, height: 14 }
                        " Save"
                    }
                }
            }
        }
    }
}

/// Standalone page for browsing any download directory
#[component]
pub fn Downloads() -> Element {
    let mut directory = use_signal(String::new);
    let files = use_signal(Vec::<FileEntry>::new);
    let error = use_signal(|| None::<String>);
    let toast = use_signal(|| None::<Toaster>);

    // Start from the server's default directory
    use_effect(move || {
        spawn(async move {
            match get_default_directory().await {
                Ok(dir) => {
                    directory.set(dir.clone());
                    refresh_files(dir, files, error).await;
                }
                Err(e) => tracing::warn!("Could not load default directory: {}", e),
            }
        });
    });

    let reload = move |_| {
        spawn(async move {
            refresh_files(directory(), files, error).await;
        });
    };

    rsx! {
        section { class: "card",
            h2 { "Downloaded files" }
            div { class: "row",
                input {
                    class: "input",
                    r#type: "text",
                    value: "{directory}",
                    placeholder: "./downloads",
                    oninput: move |evt| directory.set(evt.value()),
                }
                button { class: "btn", onclick: reload,
                    Icon { icon: FaArrowsRotate, width: 14, height: 14 }
                    " Refresh"
                }
            }
            if let Some(message) = error() {
                p { class: "toast toast-error", "{message}" }
            }
            if let Some(notice) = toast() {
                p { class: "{notice.class()}", "{notice.message()}" }
            }
            FileList { directory: directory(), files: files(), toast: toast }
        }
    }
}
