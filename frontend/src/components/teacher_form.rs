use shared::SubmissionState;
use yew::prelude::*;

use crate::components::basic_info_section::BasicInfoSection;
use crate::components::form_actions::FormActions;
use crate::components::incident_flags_section::IncidentFlagsSection;
use crate::components::narrative_section::NarrativeSection;
use crate::components::suggestion_panel::SuggestionPanel;
use crate::hooks::use_injury_form::use_injury_form;
use crate::hooks::use_reference_data::ReferenceData;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct TeacherFormProps {
    pub api_client: ApiClient,
    pub reference: ReferenceData,
}

/// The staff injury form
#[function_component(TeacherForm)]
pub fn teacher_form(props: &TeacherFormProps) -> Html {
    let form = use_injury_form(&props.api_client);
    let workflow = &form.workflow;
    let draft = workflow.draft().clone();
    let disabled = workflow.is_busy();
    let actions = form.actions.clone();

    let on_submit = {
        let check = actions.check_with_assistant.clone();
        let submit = actions.submit.clone();
        let has_review = workflow.review().is_some();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if has_review {
                submit.emit(());
            } else {
                check.emit(());
            }
        })
    };

    // Suggestions stay visible until the report is submitted or restarted
    let review = match workflow.state() {
        SubmissionState::Validating | SubmissionState::Submitted { .. } | SubmissionState::ValidationFailed { .. } => None,
        _ => workflow.review().cloned(),
    };

    html! {
        <div class="teacher-form">
            <h2>{"Boo-Boo Report"}</h2>

            {if let Some(error) = props.reference.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="injury-form" onsubmit={on_submit}>
                <BasicInfoSection
                    draft={draft.clone()}
                    children={props.reference.children.clone()}
                    teachers={props.reference.teachers.clone()}
                    disabled={disabled}
                    on_edit={actions.edit_field.clone()}
                />
                <NarrativeSection
                    draft={draft.clone()}
                    hints={workflow.hints()}
                    disabled={disabled}
                    on_edit={actions.edit_field.clone()}
                />
                <IncidentFlagsSection
                    draft={draft.clone()}
                    children={props.reference.children.clone()}
                    disabled={disabled}
                    on_edit={actions.edit_field.clone()}
                    on_bite_change={actions.set_is_bite.clone()}
                    on_peer_aggression_change={actions.set_is_peer_aggression.clone()}
                />

                {if let Some(review) = review {
                    html! {
                        <SuggestionPanel
                            review={review}
                            draft={draft.clone()}
                            disabled={disabled}
                            on_accept={actions.accept_suggestion.clone()}
                            on_accept_all={actions.accept_all_suggestions.clone()}
                        />
                    }
                } else { html! {} }}

                <FormActions
                    workflow={workflow.clone()}
                    field_error={form.field_error.clone()}
                    on_check={actions.check_with_assistant.clone()}
                    on_submit={actions.submit.clone()}
                    on_start_new={actions.start_new_report.clone()}
                />
            </form>
        </div>
    }
}
