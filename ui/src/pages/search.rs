use lifecycle::RequestOptions;
use payloads::requests::{SearchQuery, validate_search_query};
use payloads::responses::{SearchResponse, Suggestion, SuggestionList};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::client::use_api_client;
use crate::hooks::{use_api, use_title};
use crate::utils::fraction_to_percent;

#[function_component]
pub fn SearchPage() -> Html {
    use_title("Search");
    let client = use_api_client();
    let query = use_state(String::new);
    let validation = use_state(|| None::<String>);

    let results = {
        let client = client.clone();
        use_api(
            move |query: String| {
                let client = client.clone();
                async move { client.search(&SearchQuery::new(query)).await }
            },
            RequestOptions::<SearchResponse>::default(),
        )
    };
    let suggestions = use_api(
        move |query: String| {
            let client = client.clone();
            async move { client.search_suggestions(&query).await }
        },
        RequestOptions::<SuggestionList>::default(),
    );

    let on_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            query.set(input.value());
        })
    };
    let on_submit = {
        let query = query.clone();
        let validation = validation.clone();
        let search = results.execute.clone();
        let suggest = suggestions.execute.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Err(error) = validate_search_query(&query) {
                validation.set(Some(error.to_string()));
                return;
            }
            validation.set(None);
            let query = query.trim().to_string();
            search.emit(query.clone());
            suggest.emit(query);
        })
    };

    let on_clear = {
        let query = query.clone();
        let validation = validation.clone();
        let reset_results = results.reset.clone();
        let reset_suggestions = suggestions.reset.clone();
        Callback::from(move |_: MouseEvent| {
            query.set(String::new());
            validation.set(None);
            reset_results.emit(());
            reset_suggestions.emit(());
        })
    };

    html! {
        <div class="space-y-8">
            <h1 class="text-2xl font-bold">{"Search the knowledge base"}</h1>
            <form onsubmit={on_submit} class="space-y-1">
                <div class="flex gap-2">
                    <input
                        type="search"
                        placeholder="Ask a question..."
                        value={(*query).clone()}
                        oninput={on_input}
                        class="flex-1 px-3 py-2 rounded-md border border-neutral-300 dark:border-neutral-600 bg-white dark:bg-neutral-800"
                    />
                    <button
                        type="submit"
                        disabled={results.state.loading}
                        class="px-4 py-2 rounded-md bg-neutral-900 dark:bg-white text-white dark:text-neutral-900 text-sm font-medium disabled:opacity-50"
                    >
                        {"Search"}
                    </button>
                    <button
                        type="button"
                        onclick={on_clear}
                        class="px-4 py-2 rounded-md border border-neutral-300 dark:border-neutral-600 text-sm"
                    >
                        {"Clear"}
                    </button>
                </div>
                if let Some(error) = &*validation {
                    <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
                }
            </form>

            {results.render("results", |response, _, _| html! {
                <section class="space-y-4">
                    <p class="text-sm text-neutral-500">
                        {format!("{} results for \"{}\"", response.total_results, response.query)}
                    </p>
                    {for response.results.iter().map(|result| html! {
                        <article class="p-4 rounded-lg border border-neutral-200 dark:border-neutral-700">
                            <div class="flex justify-between text-xs text-neutral-500 mb-2">
                                <span>{&result.metadata.filename}</span>
                                <span>{format!(
                                    "relevance {}% · confidence {}%",
                                    fraction_to_percent(result.relevance_score),
                                    fraction_to_percent(result.confidence),
                                )}</span>
                            </div>
                            <p class="text-sm">{&result.content}</p>
                        </article>
                    })}
                    {suggestion_list("Suggestions", &response.suggestions)}
                </section>
            })}

            {suggestions.render("suggestions", |list, _, _| {
                suggestion_list("Improve the knowledge base", &list.suggestions)
            })}
        </div>
    }
}

fn suggestion_list(title: &str, suggestions: &[Suggestion]) -> Html {
    if suggestions.is_empty() {
        return html! {};
    }
    html! {
        <section>
            <h2 class="font-semibold mb-2">{title}</h2>
            <ul class="list-disc list-inside text-sm text-neutral-700 dark:text-neutral-300">
                {for suggestions.iter().map(|suggestion| match suggestion {
                    Suggestion::Enrichment(enrichment) => html! {
                        <li>
                            {&enrichment.description}
                            if let Some(priority) = &enrichment.priority {
                                <span class="ml-2 text-xs text-neutral-500">{format!("({priority} priority)")}</span>
                            }
                        </li>
                    },
                    Suggestion::Text(_) => html! { <li>{suggestion.text()}</li> },
                })}
            </ul>
        </section>
    }
}
