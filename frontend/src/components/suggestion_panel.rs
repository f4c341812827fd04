use shared::{FieldReview, NarrativeField, ReportDraft, SuggestionReview};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SuggestionPanelProps {
    pub review: SuggestionReview,
    pub draft: ReportDraft,
    pub disabled: bool,
    pub on_accept: Callback<NarrativeField>,
    pub on_accept_all: Callback<()>,
}

/// The assistant's verdict on each narrative plus the parent-facing summary
#[function_component(SuggestionPanel)]
pub fn suggestion_panel(props: &SuggestionPanelProps) -> Html {
    let review = &props.review;
    let has_acceptable = review
        .fields
        .values()
        .any(|r| matches!(r, FieldReview::Suggested { accepted: false, .. }));

    let on_accept_all = {
        let on_accept_all = props.on_accept_all.clone();
        Callback::from(move |_: MouseEvent| on_accept_all.emit(()))
    };

    html! {
        <section class="suggestion-panel">
            <h3>{"AI Assistant Review"}</h3>

            {if review.fields.is_empty() {
                html! {
                    <div class="form-message success">
                        {"Everything looks complete. You can submit the report."}
                    </div>
                }
            } else { html! {} }}

            {for review.fields.iter().map(|(field, field_review)| {
                let field = *field;
                let evaluation = field_review.evaluation();
                match field_review {
                    FieldReview::Suggested { accepted, .. } => {
                        let on_click = {
                            let on_accept = props.on_accept.clone();
                            Callback::from(move |_: MouseEvent| on_accept.emit(field))
                        };
                        html! {
                            <div class={classes!("suggestion", "sufficient", accepted.then_some("accepted"))}>
                                <div class="suggestion-field">{field.label()}</div>
                                <div class="suggestion-text">{&evaluation.suggestion}</div>
                                {if !evaluation.reason.is_empty() && evaluation.reason != "sufficient" {
                                    html! { <div class="suggestion-reason">{&evaluation.reason}</div> }
                                } else { html! {} }}
                                <button
                                    type="button"
                                    class="btn btn-small"
                                    onclick={on_click}
                                    disabled={*accepted || props.disabled}
                                >
                                    {if *accepted { "Accepted" } else { "Accept" }}
                                </button>
                            </div>
                        }
                    }
                    FieldReview::NeedsRewrite { .. } => {
                        let resolved = !props.draft.narrative(field).trim().is_empty();
                        html! {
                            <div class={classes!("suggestion", "insufficient", resolved.then_some("resolved"))}>
                                <div class="suggestion-field">{field.label()}</div>
                                <div class="suggestion-text">
                                    {if resolved {
                                        "Thanks, this field has been rewritten."
                                    } else {
                                        "Please add more detail. The guidance is shown in the field."
                                    }}
                                </div>
                            </div>
                        }
                    }
                }
            })}

            {if has_acceptable {
                html! {
                    <button type="button" class="btn btn-secondary" onclick={on_accept_all} disabled={props.disabled}>
                        {"Accept All Suggestions"}
                    </button>
                }
            } else { html! {} }}

            {if let Some(narrative) = review.parent_narrative.as_ref() {
                html! {
                    <div class="parent-narrative">
                        <h4>{"Parent Narrative"}</h4>
                        <p>{narrative}</p>
                    </div>
                }
            } else { html! {} }}
        </section>
    }
}
