use yew::prelude::*;
use yew_router::prelude::*;

pub mod client;
pub mod components;
pub mod contexts;
pub mod hooks;
mod logs;
pub mod pages;
pub mod theme;
pub mod utils;

use client::ApiProvider;
use components::MainLayout;
use contexts::ToastProvider;
use pages::{
    DashboardPage, DocumentsPage, LoginPage, NotFoundPage, SearchPage,
    TasksPage,
};

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <ApiProvider>
            <ToastProvider>
                <BrowserRouter>
                    <Switch<Route> render={switch} />
                </BrowserRouter>
            </ToastProvider>
        </ApiProvider>
    }
}

#[derive(Clone, Debug, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/tasks")]
    Tasks,
    #[at("/documents")]
    Documents,
    #[at("/search")]
    Search,
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    let page = match route {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Tasks => html! { <TasksPage /> },
        Route::Documents => html! { <DocumentsPage /> },
        Route::Search => html! { <SearchPage /> },
        Route::Login => html! { <LoginPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    };
    html! { <MainLayout>{page}</MainLayout> }
}
