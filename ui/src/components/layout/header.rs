use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::client::use_api_client;
use crate::theme::ThemeToggle;

const NAV: [(Route, &str); 4] = [
    (Route::Dashboard, "Dashboard"),
    (Route::Tasks, "Tasks"),
    (Route::Documents, "Documents"),
    (Route::Search, "Search"),
];

#[function_component]
pub fn Header() -> Html {
    let client = use_api_client();
    let current = use_route::<Route>();
    let navigator = use_navigator();
    // Re-read on every render; the token lives in localStorage.
    let signed_in = client.is_authenticated();

    let on_sign_out = {
        let client = client.clone();
        Callback::from(move |_: MouseEvent| {
            client.clear_auth_token();
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Login);
            }
        })
    };

    let link_class = |route: &Route| {
        if current.as_ref() == Some(route) {
            "px-3 py-2 rounded-md text-sm font-medium bg-neutral-100 dark:bg-neutral-700 text-neutral-900 dark:text-white"
        } else {
            "px-3 py-2 rounded-md text-sm font-medium text-neutral-600 dark:text-neutral-300 hover:text-neutral-900 dark:hover:text-white"
        }
    };

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex items-center space-x-8">
                        <Link<Route> to={Route::Dashboard} classes="text-xl font-semibold text-neutral-900 dark:text-white">
                            {"Agent Console"}
                        </Link<Route>>
                        <nav class="flex space-x-1">
                            {for NAV.iter().map(|(route, label)| html! {
                                <Link<Route> to={route.clone()} classes={link_class(route)}>
                                    {*label}
                                </Link<Route>>
                            })}
                        </nav>
                    </div>
                    <div class="flex items-center space-x-4">
                        <ThemeToggle />
                        if signed_in {
                            <button
                                onclick={on_sign_out}
                                class="text-sm text-neutral-600 dark:text-neutral-300 hover:text-neutral-900 dark:hover:text-white"
                            >
                                {"Sign out"}
                            </button>
                        } else {
                            <Link<Route> to={Route::Login} classes="text-sm text-neutral-600 dark:text-neutral-300 hover:text-neutral-900 dark:hover:text-white">
                                {"Sign in"}
                            </Link<Route>>
                        }
                    </div>
                </div>
            </div>
        </header>
    }
}
