use shared::InjuryReportDetails;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::date_utils::format_report_date;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct MemoViewProps {
    pub api_client: ApiClient,
    pub report_id: String,
    pub on_back: Callback<()>,
}

#[derive(Clone, PartialEq)]
enum MemoState {
    Loading,
    Ready { memo: String, details: Option<InjuryReportDetails> },
    Failed(String),
}

/// Printable parent memo for one report
#[function_component(MemoView)]
pub fn memo_view(props: &MemoViewProps) -> Html {
    let state = use_state(|| MemoState::Loading);
    let attempt = use_state(|| 0u32);

    use_effect_with((props.report_id.clone(), *attempt), {
        let api_client = props.api_client.clone();
        let state = state.clone();
        move |(report_id, _): &(String, u32)| {
            let report_id = report_id.clone();
            state.set(MemoState::Loading);
            spawn_local(async move {
                match api_client.get_memo(&report_id).await {
                    Ok(memo) => {
                        let details = api_client.get_report(&report_id).await.ok();
                        state.set(MemoState::Ready { memo: memo.memo_content, details });
                    }
                    Err(e) => {
                        Logger::error_with_component("memo_view", &format!("Memo for {} failed: {}", report_id, e));
                        state.set(MemoState::Failed(e));
                    }
                }
            });
            || ()
        }
    });

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    let on_print = Callback::from(|_: MouseEvent| {
        if let Some(window) = web_sys::window() {
            let _ = window.print();
        }
    });

    let on_retry = {
        let attempt = attempt.clone();
        Callback::from(move |_: MouseEvent| attempt.set(*attempt + 1))
    };

    let body = match &*state {
        MemoState::Loading => html! { <p class="memo-loading">{"Preparing memo..."}</p> },
        MemoState::Failed(message) => html! {
            <div class="form-message error">
                {message}
                <button type="button" class="btn btn-secondary" onclick={on_retry}>{"Try Again"}</button>
            </div>
        },
        MemoState::Ready { memo, details } => html! {
            <article class="memo">
                {if let Some(details) = details {
                    html! {
                        <header class="memo-header">
                            <h2>{"Injury Report"}</h2>
                            <div>{format!("Child: {}", details.child_display_name())}</div>
                            <div>{format!("Date: {}", format_report_date(&details.report.injury_timestamp))}</div>
                        </header>
                    }
                } else { html! {} }}
                <div class="memo-content" style="white-space: pre-wrap;">{memo}</div>
            </article>
        },
    };

    html! {
        <div class="memo-view">
            <div class="memo-toolbar no-print">
                <button type="button" class="btn btn-secondary" onclick={on_back}>{"Back"}</button>
                <button
                    type="button"
                    class="btn btn-primary"
                    onclick={on_print}
                    disabled={!matches!(*state, MemoState::Ready { .. })}
                >
                    {"Print"}
                </button>
            </div>
            {body}
        </div>
    }
}
