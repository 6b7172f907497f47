use yew::prelude::*;

const APP_NAME: &str = "Agent Console";

/// Sets the document title to `"{title} | Agent Console"`. Pages set their
/// own title on mount, so nothing is restored on unmount.
#[hook]
pub fn use_title(title: &str) {
    let title = format!("{title} | {APP_NAME}");
    use_effect_with(title, |title| {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            doc.set_title(title);
        }
    });
}
