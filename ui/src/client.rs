//! Composition root for the API client.

use payloads::{APIClient, ClientConfig, TokenStore};
use std::rc::Rc;
use std::sync::Arc;
use web_sys::window;
use yew::prelude::*;

/// localStorage key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const LOGIN_PATH: &str = "/login";

/// Keeps the auth token in the browser's localStorage so it survives
/// reloads.
pub struct LocalStorageTokenStore;

fn local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok().flatten()
}

impl TokenStore for LocalStorageTokenStore {
    fn get(&self) -> Option<String> {
        local_storage()?
            .get_item(AUTH_TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn set(&self, token: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(AUTH_TOKEN_KEY, token);
        }
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(AUTH_TOKEN_KEY);
        }
    }
}

/// Configuration baked in at build time. Without `API_BASE_URL` the page's
/// own origin is used.
pub fn client_config() -> ClientConfig {
    let config = ClientConfig::from_lookup(|key| {
        match key {
            "API_BASE_URL" => option_env!("API_BASE_URL"),
            "API_TIMEOUT_MS" => option_env!("API_TIMEOUT_MS"),
            "API_RETRY_ATTEMPTS" => option_env!("API_RETRY_ATTEMPTS"),
            "API_RETRY_DELAY_MS" => option_env!("API_RETRY_DELAY_MS"),
            "CLIENT_VERSION" => option_env!("CLIENT_VERSION"),
            _ => None,
        }
        .map(str::to_string)
    });

    if option_env!("API_BASE_URL").is_some() {
        return config;
    }
    match window().and_then(|w| w.location().origin().ok()) {
        Some(origin) => config.with_base_url(origin),
        None => config,
    }
}

/// Build the one client the app uses. A 401 sends the browser to the login
/// view.
pub fn build_api_client() -> APIClient {
    APIClient::new(client_config(), Arc::new(LocalStorageTokenStore))
        .with_unauthorized_handler(|| {
            let Some(window) = window() else { return };
            let location = window.location();
            if location.pathname().ok().as_deref() != Some(LOGIN_PATH) {
                let _ = location.set_href(LOGIN_PATH);
            }
        })
}

/// The shared client, provided through a Yew context.
#[derive(Clone)]
pub struct ApiContext(pub Rc<APIClient>);

impl PartialEq for ApiContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Properties, PartialEq)]
pub struct ApiProviderProps {
    pub children: Children,
}

#[function_component]
pub fn ApiProvider(props: &ApiProviderProps) -> Html {
    let context = use_memo((), |_| ApiContext(Rc::new(build_api_client())));

    html! {
        <ContextProvider<ApiContext> context={(*context).clone()}>
            {props.children.clone()}
        </ContextProvider<ApiContext>>
    }
}

#[hook]
pub fn use_api_client() -> Rc<APIClient> {
    let context = use_context::<ApiContext>()
        .expect("use_api_client must be used within an ApiProvider");
    context.0
}
