use futures::StreamExt;
use futures::channel::mpsc;
use js_sys::Uint8Array;
use lifecycle::RequestOptions;
use payloads::requests::validate_upload_filename;
use payloads::responses::{DocumentList, UploadedDocument};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::client::use_api_client;
use crate::components::ProgressBar;
use crate::contexts::toast::{Toast, ToastType};
use crate::contexts::use_toast;
use crate::hooks::{use_api, use_title};
use crate::utils::{format_bytes, format_datetime};

#[derive(Debug, Clone, Default, PartialEq)]
struct Upload {
    file_name: String,
    data: Vec<u8>,
}

async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|error| format!("Could not read {}: {error:?}", file.name()))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

#[function_component]
pub fn DocumentsPage() -> Html {
    use_title("Documents");
    let client = use_api_client();
    let toast = use_toast();
    let progress = use_state(|| None::<u8>);
    let validation = use_state(|| None::<String>);

    let documents = {
        let client = client.clone();
        use_api(
            move |()| {
                let client = client.clone();
                async move { client.list_documents().await }
            },
            RequestOptions::<DocumentList>::default().immediate(true),
        )
    };

    let upload = {
        let progress = progress.clone();
        let reload = documents.execute.clone();
        let failed = toast.clone();
        let toast = toast.clone();
        use_api(
            move |upload: Upload| {
                let client = client.clone();
                let progress = progress.clone();
                async move {
                    // The progress callback must be Send; percentages are
                    // relayed to the component through a channel.
                    let (sender, mut receiver) = mpsc::unbounded::<u8>();
                    yew::platform::spawn_local(async move {
                        while let Some(percent) = receiver.next().await {
                            progress.set(Some(percent));
                        }
                    });
                    client
                        .upload_document(&upload.file_name, upload.data, move |percent| {
                            let _ = sender.unbounded_send(percent);
                        })
                        .await
                }
            },
            RequestOptions::<UploadedDocument>::default()
                .on_success(move |uploaded| {
                    toast.success(format!("Uploaded {}", uploaded.filename));
                    reload.emit(());
                })
                .on_error(move |error| {
                    failed.add(
                        Toast::new(format!("Upload failed: {error}"), ToastType::Error)
                            .no_auto_dismiss(),
                    )
                }),
        )
    };

    let on_file = {
        let validation = validation.clone();
        let progress = progress.clone();
        let toast = toast.clone();
        let execute = upload.execute.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let file_name = file.name();
            if let Err(error) = validate_upload_filename(&file_name) {
                validation.set(Some(error.to_string()));
                input.set_value("");
                return;
            }
            validation.set(None);
            progress.set(Some(0));

            let toast = toast.clone();
            let execute = execute.clone();
            yew::platform::spawn_local(async move {
                match read_file(&file).await {
                    Ok(data) => execute.emit(Upload { file_name, data }),
                    Err(error) => {
                        tracing::warn!("{error}");
                        toast.error(error);
                    }
                }
            });
            input.set_value("");
        })
    };

    html! {
        <div class="space-y-8">
            <h1 class="text-2xl font-bold">{"Documents"}</h1>

            <section class="p-4 rounded-lg border border-neutral-200 dark:border-neutral-700 space-y-3">
                <label for="document-file" class="block text-sm font-medium">
                    {"Add to the knowledge base (.pdf, .txt, .md)"}
                </label>
                <input
                    id="document-file"
                    type="file"
                    accept=".pdf,.txt,.md"
                    disabled={upload.state.loading}
                    onchange={on_file}
                    class="block text-sm"
                />
                if let Some(error) = &*validation {
                    <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
                }
                if let Some(percent) = *progress {
                    if upload.state.loading || percent < 100 {
                        <ProgressBar value={percent} label="Uploading" />
                    }
                }
            </section>

            {documents.render("documents", |list, _, _| html! {
                <>
                if list.documents.is_empty() {
                    <p class="text-sm text-neutral-500">{"No documents uploaded yet."}</p>
                } else {
                    <table class="w-full text-sm">
                        <thead>
                            <tr class="text-left text-neutral-500 border-b border-neutral-200 dark:border-neutral-700">
                                <th class="py-2">{"Name"}</th>
                                <th class="py-2">{"Size"}</th>
                                <th class="py-2">{"Uploaded"}</th>
                                <th class="py-2">{"Tags"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {for list.documents.iter().map(|document| html! {
                                <tr class="border-b border-neutral-100 dark:border-neutral-800">
                                    <td class="py-2">{&document.filename}</td>
                                    <td class="py-2">{format_bytes(document.file_size, 1)}</td>
                                    <td class="py-2">{format_datetime(&document.upload_date)}</td>
                                    <td class="py-2">{document.tags.join(", ")}</td>
                                </tr>
                            })}
                        </tbody>
                    </table>
                }
                </>
            })}
        </div>
    }
}
