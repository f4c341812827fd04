//! Drives [`SubmissionWorkflow`] from the staff injury form.
//!
//! The workflow refuses edits while a request is in flight, so an async
//! continuation can keep mutating its own copy and publish it when done.

use shared::{DraftField, NarrativeField, SubmissionWorkflow, WorkflowError};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::date_utils::{get_current_date, get_current_time, get_utc_offset_minutes};
use crate::services::logging::Logger;

const COMPONENT: &str = "injury_form";

pub struct UseInjuryFormResult {
    pub workflow: SubmissionWorkflow,
    /// Field-level problem from the last attempted step
    pub field_error: Option<String>,
    pub actions: InjuryFormActions,
}

#[derive(Clone, PartialEq)]
pub struct InjuryFormActions {
    pub edit_field: Callback<(DraftField, String)>,
    pub set_is_bite: Callback<bool>,
    pub set_is_peer_aggression: Callback<bool>,
    pub check_with_assistant: Callback<()>,
    pub accept_suggestion: Callback<NarrativeField>,
    pub accept_all_suggestions: Callback<()>,
    pub submit: Callback<()>,
    pub start_new_report: Callback<()>,
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn apply<F>(workflow: &UseStateHandle<SubmissionWorkflow>, field_error: &UseStateHandle<Option<String>>, f: F)
where
    F: FnOnce(&mut SubmissionWorkflow) -> Result<(), WorkflowError>,
{
    let mut next = (**workflow).clone();
    match f(&mut next) {
        Ok(()) => {
            workflow.set(next);
            field_error.set(None);
        }
        Err(WorkflowError::Busy) => {}
        Err(e) => field_error.set(Some(e.to_string())),
    }
}

#[hook]
pub fn use_injury_form(api_client: &ApiClient) -> UseInjuryFormResult {
    let workflow = use_state(|| {
        SubmissionWorkflow::new(get_current_date(), get_current_time(), get_utc_offset_minutes())
    });
    let field_error = use_state(|| Option::<String>::None);

    let edit_field = {
        let workflow = workflow.clone();
        let field_error = field_error.clone();
        Callback::from(move |(field, value): (DraftField, String)| {
            apply(&workflow, &field_error, |wf| wf.edit_field(field, value));
        })
    };

    let set_is_bite = {
        let workflow = workflow.clone();
        let field_error = field_error.clone();
        Callback::from(move |checked: bool| {
            apply(&workflow, &field_error, |wf| wf.set_is_bite(checked));
        })
    };

    let set_is_peer_aggression = {
        let workflow = workflow.clone();
        let field_error = field_error.clone();
        Callback::from(move |checked: bool| {
            apply(&workflow, &field_error, |wf| wf.set_is_peer_aggression(checked));
        })
    };

    let check_with_assistant = {
        let api_client = api_client.clone();
        let workflow = workflow.clone();
        let field_error = field_error.clone();
        Callback::from(move |_| {
            let mut next = (*workflow).clone();
            let request = match next.request_validation() {
                Ok(request) => request,
                Err(e) => {
                    field_error.set(Some(e.to_string()));
                    return;
                }
            };
            field_error.set(None);
            workflow.set(next.clone());

            let api_client = api_client.clone();
            let workflow = workflow.clone();
            spawn_local(async move {
                let outcome = match api_client.enhance_report(&request).await {
                    Ok(result) => {
                        Logger::info_with_component(
                            COMPONENT,
                            &format!("Assistant returned {} evaluations", result.evaluations.len()),
                        );
                        next.validation_succeeded(result)
                    }
                    Err(message) => {
                        Logger::warn_with_component(COMPONENT, &format!("Assistant check failed: {}", message));
                        next.validation_failed(message)
                    }
                };
                if let Err(e) = outcome {
                    Logger::error_with_component(COMPONENT, &e.to_string());
                }
                workflow.set(next);
            });
        })
    };

    let accept_suggestion = {
        let workflow = workflow.clone();
        let field_error = field_error.clone();
        Callback::from(move |field: NarrativeField| {
            apply(&workflow, &field_error, |wf| wf.accept_suggestion(field));
        })
    };

    let accept_all_suggestions = {
        let workflow = workflow.clone();
        let field_error = field_error.clone();
        Callback::from(move |_| {
            apply(&workflow, &field_error, |wf| wf.accept_all_suggestions().map(|_| ()));
        })
    };

    let submit = {
        let api_client = api_client.clone();
        let workflow = workflow.clone();
        let field_error = field_error.clone();
        Callback::from(move |_| {
            let mut next = (*workflow).clone();
            let report = match next.begin_submit() {
                Ok(report) => report,
                Err(e) => {
                    field_error.set(Some(e.to_string()));
                    return;
                }
            };
            field_error.set(None);
            workflow.set(next.clone());

            let api_client = api_client.clone();
            let workflow = workflow.clone();
            spawn_local(async move {
                let outcome = match api_client.create_report(&report).await {
                    Ok(response) => {
                        Logger::info_with_component(COMPONENT, &format!("Submitted report {}", response.report.id));
                        next.submit_succeeded(response.report.id, get_current_date(), get_current_time())
                    }
                    Err(message) => {
                        Logger::error_with_component(COMPONENT, &format!("Submit failed: {}", message));
                        alert(&format!("Failed to submit the report: {}", message));
                        next.submit_failed(message)
                    }
                };
                if let Err(e) = outcome {
                    Logger::error_with_component(COMPONENT, &e.to_string());
                }
                workflow.set(next);
            });
        })
    };

    let start_new_report = {
        let workflow = workflow.clone();
        let field_error = field_error.clone();
        Callback::from(move |_| {
            let mut next = (*workflow).clone();
            next.reset(get_current_date(), get_current_time());
            workflow.set(next);
            field_error.set(None);
        })
    };

    UseInjuryFormResult {
        workflow: (*workflow).clone(),
        field_error: (*field_error).clone(),
        actions: InjuryFormActions {
            edit_field,
            set_is_bite,
            set_is_peer_aggression,
            check_with_assistant,
            accept_suggestion,
            accept_all_suggestions,
            submit,
            start_new_report,
        },
    }
}
