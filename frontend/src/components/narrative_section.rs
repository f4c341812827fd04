use shared::{DraftField, DraftHints, NarrativeField, ReportDraft};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NarrativeSectionProps {
    pub draft: ReportDraft,
    pub hints: DraftHints,
    pub disabled: bool,
    pub on_edit: Callback<(DraftField, String)>,
}

fn default_placeholder(field: NarrativeField) -> &'static str {
    match field {
        NarrativeField::IncidentDescription => "What was the child doing when it happened?",
        NarrativeField::InjuryDescription => "Where is the injury and what does it look like?",
        NarrativeField::ActionTaken => "What first aid and comfort did you give?",
    }
}

/// The three free-text fields the assistant reviews.
///
/// A field cleared by the assistant shows its guidance as the placeholder and
/// the text that was there before underneath.
#[function_component(NarrativeSection)]
pub fn narrative_section(props: &NarrativeSectionProps) -> Html {
    html! {
        <section class="form-section narrative-section">
            <h3>{"What Happened"}</h3>
            {for NarrativeField::ALL.iter().map(|field| {
                let field = *field;
                let id = field.api_name();
                let placeholder = props
                    .hints
                    .placeholders
                    .get(&field)
                    .cloned()
                    .unwrap_or_else(|| default_placeholder(field).to_string());
                let needs_rewrite = props.hints.placeholders.contains_key(&field)
                    && props.draft.narrative(field).trim().is_empty();

                let onchange = {
                    let on_edit = props.on_edit.clone();
                    Callback::from(move |e: Event| {
                        let textarea: HtmlTextAreaElement = e.target_unchecked_into();
                        on_edit.emit((field.into(), textarea.value()));
                    })
                };

                html! {
                    <div class={classes!("form-group", needs_rewrite.then_some("needs-rewrite"))}>
                        <label for={id}>{field.label()}</label>
                        <textarea
                            id={id}
                            rows="3"
                            placeholder={placeholder}
                            value={props.draft.narrative(field).to_string()}
                            onchange={onchange}
                            disabled={props.disabled}
                        />
                        {if let Some(previous) = props.hints.previous.get(&field) {
                            html! {
                                <div class="previous-value">
                                    <span class="previous-label">{"You wrote: "}</span>
                                    {previous}
                                </div>
                            }
                        } else { html! {} }}
                    </div>
                }
            })}
        </section>
    }
}
