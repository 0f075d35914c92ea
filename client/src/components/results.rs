//! Result cards for the latest batch.

use leptos::prelude::*;

use frames::{SearchResponse, VideoItem, metric_label};

use crate::state::search::SearchState;

/// All responses of the most recent batch, in frame order.
#[component]
pub fn Results() -> impl IntoView {
    let search = expect_context::<RwSignal<SearchState>>();

    view! {
        <section class="results">
            {move || {
                let responses = search.get().responses;
                if responses.is_empty() {
                    return view! { <div class="results__empty">"No results yet"</div> }.into_any();
                }
                responses
                    .into_iter()
                    .map(|response| view! { <ResponseCard response=response/> })
                    .collect::<Vec<_>>()
                    .into_any()
            }}
        </section>
    }
}

/// One query's results with its sentiment and readability averages.
#[component]
pub fn ResponseCard(response: SearchResponse) -> impl IntoView {
    let sentiment = response
        .sentiment
        .as_ref()
        .map_or_else(|| "no sentiment".to_owned(), |s| format!("{} {}", s.emoticon(), s.label()));
    let grade = metric_label(response.flesch_kincaid_grade_level_avg);
    let ease = metric_label(response.flesch_reading_score_avg);
    let count = response.item_count();

    view! {
        <article class="response-card">
            <header class="response-card__header">
                <h2 class="response-card__query">{response.query}</h2>
                <span class="response-card__sentiment">{sentiment}</span>
                <span class="response-card__metrics">{format!("grade {grade} · ease {ease} · {count} videos")}</span>
            </header>
            <ol class="response-card__items">
                {response.items.into_iter().map(|item| view! { <VideoRow item=item/> }).collect::<Vec<_>>()}
            </ol>
        </article>
    }
}

#[component]
fn VideoRow(item: VideoItem) -> impl IntoView {
    let watch = item.watch_url();
    let channel = item.channel_url();
    let thumbnail = item.thumbnail_url().map(str::to_owned);
    let readability = format!(
        "grade {} · ease {}",
        metric_label(item.flesch_kincaid_grade_level),
        metric_label(item.flesch_reading_score)
    );

    view! {
        <li class="video-row">
            {thumbnail.map(|src| view! { <img class="video-row__thumb" src=src alt=""/> })}
            <div class="video-row__body">
                <a class="video-row__title" href=watch target="_blank">{item.snippet.title}</a>
                <a class="video-row__channel" href=channel target="_blank">{item.snippet.channel_title}</a>
                <span class="video-row__metrics">{readability}</span>
            </div>
        </li>
    }
}
