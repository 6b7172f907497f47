use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{ErrorBoundary, ToastContainer, layout::Header};

#[derive(Properties, PartialEq)]
pub struct MainLayoutProps {
    pub children: Children,
}

#[function_component]
pub fn MainLayout(props: &MainLayoutProps) -> Html {
    // A failure on one page does not follow the user to the next.
    let boundary_key = use_route::<Route>()
        .map(|route| route.to_path())
        .unwrap_or_default();

    html! {
        <div class="min-h-screen bg-white dark:bg-neutral-900 text-neutral-900 dark:text-neutral-100 transition-colors">
            <Header />
            <ToastContainer />
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <ErrorBoundary key={boundary_key}>
                    {props.children.clone()}
                </ErrorBoundary>
            </main>
        </div>
    }
}
