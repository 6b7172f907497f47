use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ProgressBarProps {
    /// Whole percent; values above 100 are shown as 100.
    pub value: u8,
    #[prop_or_default]
    pub label: Option<AttrValue>,
}

#[function_component]
pub fn ProgressBar(props: &ProgressBarProps) -> Html {
    let value = props.value.min(100);

    html! {
        <div class="w-full">
            if let Some(label) = &props.label {
                <div class="flex justify-between mb-1 text-sm text-neutral-700 dark:text-neutral-300">
                    <span>{label}</span>
                    <span>{format!("{value}%")}</span>
                </div>
            }
            <div
                class="w-full h-2 rounded-full bg-neutral-200 dark:bg-neutral-700"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow={value.to_string()}
            >
                <div
                    class="h-2 rounded-full bg-blue-600 transition-all duration-300"
                    style={format!("width: {value}%")}
                />
            </div>
        </div>
    }
}
