use shared::{SubmissionState, SubmissionWorkflow};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FormActionsProps {
    pub workflow: SubmissionWorkflow,
    pub field_error: Option<String>,
    pub on_check: Callback<()>,
    pub on_submit: Callback<()>,
    pub on_start_new: Callback<()>,
}

/// Status messages and the buttons that move the workflow forward
#[function_component(FormActions)]
pub fn form_actions(props: &FormActionsProps) -> Html {
    let workflow = &props.workflow;
    let busy = workflow.is_busy();

    let emit = |callback: &Callback<()>| {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| callback.emit(()))
    };

    let status = match workflow.state() {
        SubmissionState::Validating => html! {
            <div class="form-message info">{"Checking with the AI assistant..."}</div>
        },
        SubmissionState::Submitting { .. } => html! {
            <div class="form-message info">{"Submitting report..."}</div>
        },
        SubmissionState::ValidationFailed { message } => html! {
            <div class="form-message error">
                <strong>{"Validation Error: "}</strong>{message}
            </div>
        },
        SubmissionState::SubmitFailed { message, .. } => html! {
            <div class="form-message error">
                <strong>{"Submission failed: "}</strong>{message}
            </div>
        },
        SubmissionState::Submitted { .. } => html! {
            <div class="form-message success">{"Injury report submitted successfully!"}</div>
        },
        _ => html! {},
    };

    let unresolved: Vec<&str> = workflow.unresolved_fields().iter().map(|f| f.label()).collect();
    let submit_title = if unresolved.is_empty() {
        String::new()
    } else {
        format!("Rewrite first: {}", unresolved.join(", "))
    };
    let submit_label = if matches!(workflow.state(), SubmissionState::Submitting { .. }) {
        "Submitting..."
    } else {
        "Submit Report"
    };
    let primary = match workflow.state() {
        SubmissionState::ValidationFailed { .. } => html! {
            <>
                <button type="button" class="btn btn-primary" onclick={emit(&props.on_check)}>
                    {"Try Again"}
                </button>
                <button type="button" class="btn btn-secondary" onclick={emit(&props.on_submit)}>
                    {"Submit As Is"}
                </button>
            </>
        },
        SubmissionState::Drafting { review: None, bypass: true } => html! {
            <>
                <button type="button" class="btn btn-primary" onclick={emit(&props.on_check)}>
                    {"Check with AI Assistant"}
                </button>
                <button type="button" class="btn btn-secondary" onclick={emit(&props.on_submit)}>
                    {"Submit As Is"}
                </button>
            </>
        },
        SubmissionState::Submitted { .. } => html! {
            <button type="button" class="btn btn-primary" onclick={emit(&props.on_start_new)}>
                {"Start a New Report"}
            </button>
        },
        _ if workflow.review().is_some() || matches!(workflow.state(), SubmissionState::SubmitFailed { .. }) => html! {
            <button
                type="button"
                class="btn btn-primary"
                onclick={emit(&props.on_submit)}
                disabled={busy || !workflow.can_submit()}
                title={submit_title.clone()}
            >
                {submit_label}
            </button>
        },
        _ => html! {
            <button type="button" class="btn btn-primary" onclick={emit(&props.on_check)} disabled={busy}>
                {if busy { "Checking..." } else { "Check with AI Assistant" }}
            </button>
        },
    };

    html! {
        <div class="form-actions">
            {status}
            {if let Some(error) = props.field_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
            <div class="form-buttons">{primary}</div>
        </div>
    }
}
