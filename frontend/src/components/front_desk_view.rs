use shared::FrontDeskAction;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::actor_select_modal::ActorSelectModal;
use crate::components::report_card::ReportCard;
use crate::hooks::use_front_desk::use_front_desk;
use crate::hooks::use_reference_data::ReferenceData;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct FrontDeskViewProps {
    pub api_client: ApiClient,
    pub reference: ReferenceData,
    pub on_view_memo: Callback<String>,
}

/// Open modal: which action, on which report, for which child
#[derive(Clone, PartialEq)]
struct PendingAction {
    action: FrontDeskAction,
    report_id: String,
    child_name: String,
}

#[function_component(FrontDeskView)]
pub fn front_desk_view(props: &FrontDeskViewProps) -> Html {
    let desk = use_front_desk(&props.api_client);
    let modal = use_state(|| Option::<PendingAction>::None);

    let on_filter_change = {
        let set_only_unreviewed = desk.actions.set_only_unreviewed.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            set_only_unreviewed.emit(input.checked());
        })
    };

    let on_refresh = {
        let refresh = desk.actions.refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    let on_close_modal = {
        let modal = modal.clone();
        Callback::from(move |_| modal.set(None))
    };

    let on_confirm = {
        let modal = modal.clone();
        let perform = desk.actions.perform.clone();
        Callback::from(move |user_id: String| {
            if let Some(pending) = (*modal).clone() {
                let modal = modal.clone();
                let done = Callback::from(move |succeeded: bool| {
                    if succeeded {
                        modal.set(None);
                    }
                });
                perform.emit((pending.action, pending.report_id, user_id, done));
            }
        })
    };

    html! {
        <div class="front-desk-view">
            <div class="front-desk-header">
                <h2>{"Front Desk"}</h2>
                <label class="checkbox">
                    <input type="checkbox" checked={desk.state.only_unreviewed} onchange={on_filter_change} />
                    {" Only unreviewed"}
                </label>
                <button type="button" class="btn btn-secondary" onclick={on_refresh} disabled={desk.state.loading}>
                    {if desk.state.loading { "Loading..." } else { "Refresh" }}
                </button>
            </div>

            {if let Some(error) = desk.state.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            {if desk.state.reports.is_empty() && !desk.state.loading {
                html! { <p class="empty-state">{"No reports to show."}</p> }
            } else { html! {} }}

            <div class="report-list">
                {for desk.state.reports.iter().map(|details| {
                    let on_action = {
                        let modal = modal.clone();
                        let report_id = details.report.id.clone();
                        let child_name = details.child_display_name().to_string();
                        Callback::from(move |action: FrontDeskAction| {
                            modal.set(Some(PendingAction {
                                action,
                                report_id: report_id.clone(),
                                child_name: child_name.clone(),
                            }));
                        })
                    };
                    html! {
                        <ReportCard
                            key={details.report.id.clone()}
                            details={details.clone()}
                            on_action={on_action}
                            on_view_memo={props.on_view_memo.clone()}
                        />
                    }
                })}
            </div>

            {if let Some(pending) = (*modal).clone() {
                html! {
                    <ActorSelectModal
                        action={pending.action}
                        child_name={pending.child_name}
                        staff={props.reference.front_desk.clone()}
                        pending={desk.state.pending}
                        on_confirm={on_confirm}
                        on_close={on_close_modal}
                    />
                }
            } else { html! {} }}
        </div>
    }
}
