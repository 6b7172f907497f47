use web_sys::window;
use yew::prelude::*;
use yewdux::prelude::*;

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }

    /// The theme the toggle switches to from an effective theme.
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::System => Theme::Dark,
        }
    }
}

#[derive(Default, Clone, PartialEq, Store)]
pub struct ThemeState {
    pub theme: Theme,
    /// The theme actually shown; System resolved to Light or Dark.
    pub effective_theme: Theme,
}

fn storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok().flatten()
}

pub fn get_system_theme() -> Theme {
    let prefers_dark = window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok())
        .flatten()
        .is_some_and(|query| query.matches());
    if prefers_dark { Theme::Dark } else { Theme::Light }
}

pub fn get_stored_theme() -> Theme {
    storage()
        .and_then(|s| s.get_item(THEME_KEY).ok().flatten())
        .map(|theme| Theme::parse(&theme))
        .unwrap_or_default()
}

fn store_theme(theme: Theme) {
    let Some(storage) = storage() else { return };
    // System is the default, so nothing needs remembering.
    let _ = match theme {
        Theme::System => storage.remove_item(THEME_KEY),
        theme => storage.set_item(THEME_KEY, theme.as_str()),
    };
}

pub fn apply_theme_to_document(theme: Theme) {
    let Some(html) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let classes = html.class_list();
    let _ = classes.remove_1("dark");
    if theme == Theme::Dark {
        let _ = classes.add_1("dark");
    }
}

pub fn resolve_effective_theme(theme: Theme) -> Theme {
    match theme {
        Theme::System => get_system_theme(),
        theme => theme,
    }
}

#[hook]
pub fn use_theme() -> (Theme, Theme, Callback<Theme>) {
    let (state, dispatch) = use_store::<ThemeState>();

    let setter = use_callback(
        dispatch.clone(),
        move |new_theme: Theme, dispatch: &Dispatch<ThemeState>| {
            let effective = resolve_effective_theme(new_theme);
            store_theme(new_theme);
            apply_theme_to_document(effective);
            dispatch.reduce_mut(|state| {
                state.theme = new_theme;
                state.effective_theme = effective;
            });
        },
    );

    (state.theme, state.effective_theme, setter)
}

#[function_component]
pub fn ThemeToggle() -> Html {
    let (_, effective_theme, set_theme) = use_theme();

    // Initialize theme on first render
    {
        let set_theme = set_theme.clone();
        use_effect_with((), move |_| {
            set_theme.emit(get_stored_theme());
            || ()
        });
    }

    let toggle_theme = use_callback(
        (effective_theme, set_theme),
        move |_: MouseEvent, (effective_theme, set_theme)| {
            set_theme.emit(effective_theme.toggled());
        },
    );

    let (icon, title) = match effective_theme {
        Theme::Dark => ("☀️", "Switch to light mode"),
        Theme::Light | Theme::System => ("🌙", "Switch to dark mode"),
    };

    html! {
        <button
            class="p-2 rounded-lg hover:bg-neutral-200 dark:hover:bg-neutral-700 transition-colors"
            onclick={toggle_theme}
            title={title}
            aria-label={title}
        >
            <span class="text-xl">{icon}</span>
        </button>
    }
}
