use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::Route;
use crate::client::use_api_client;
use crate::contexts::use_toast;
use crate::hooks::{use_push_route, use_title};
use crate::utils::is_dev_mode;

#[function_component]
pub fn LoginPage() -> Html {
    use_title("Sign in");
    let client = use_api_client();
    let toast = use_toast();
    let push_route = use_push_route();
    let token = use_state(String::new);
    let error = use_state(|| None::<String>);

    let on_input = {
        let token = token.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            token.set(input.value());
        })
    };

    let on_submit = {
        let token = token.clone();
        let error = error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let value = token.trim();
            if value.is_empty() {
                error.set(Some("Access token is required".into()));
                return;
            }
            error.set(None);
            client.set_auth_token(value);
            toast.success("Signed in");
            push_route.emit(Route::Dashboard);
        })
    };

    html! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <form onsubmit={on_submit} class="max-w-md w-full space-y-4 p-6 rounded-lg border border-neutral-200 dark:border-neutral-700">
                <div>
                    <h1 class="text-xl font-semibold">{"Sign in to Agent Console"}</h1>
                    <p class="text-sm text-neutral-600 dark:text-neutral-400">
                        {"Paste the API access token issued for your account."}
                    </p>
                </div>
                <input
                    type="password"
                    autocomplete="off"
                    placeholder="Access token"
                    value={(*token).clone()}
                    oninput={on_input}
                    class="w-full px-3 py-2 rounded-md border border-neutral-300 dark:border-neutral-600 bg-white dark:bg-neutral-800"
                />
                if let Some(error) = &*error {
                    <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
                }
                if is_dev_mode() {
                    <p class="text-xs text-neutral-500">{"The dev server accepts any token."}</p>
                }
                <button
                    type="submit"
                    class="w-full px-4 py-2 rounded-md bg-neutral-900 dark:bg-white text-white dark:text-neutral-900 text-sm font-medium"
                >
                    {"Sign in"}
                </button>
            </form>
        </div>
    }
}
