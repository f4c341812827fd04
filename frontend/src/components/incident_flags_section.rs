use shared::{Child, DraftField, ReportDraft};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct IncidentFlagsSectionProps {
    pub draft: ReportDraft,
    pub children: Vec<Child>,
    pub disabled: bool,
    pub on_edit: Callback<(DraftField, String)>,
    pub on_bite_change: Callback<bool>,
    pub on_peer_aggression_change: Callback<bool>,
}

/// Staff-only details. The other child is never shown to parents or sent to the assistant.
#[function_component(IncidentFlagsSection)]
pub fn incident_flags_section(props: &IncidentFlagsSectionProps) -> Html {
    let draft = &props.draft;

    let checkbox = |callback: &Callback<bool>| {
        let callback = callback.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            callback.emit(input.checked());
        })
    };

    // The injured child cannot be the other child
    let other_child_select = |field: DraftField, label: &'static str| {
        let on_edit = props.on_edit.clone();
        let onchange = Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_edit.emit((field, select.value()));
        });
        let selected = draft.value(field).to_string();

        html! {
            <div class="form-group nested">
                <label>{label}</label>
                <select onchange={onchange} disabled={props.disabled}>
                    <option value="" selected={selected.is_empty()}>{"Select a child"}</option>
                    {for props.children.iter().filter(|c| c.id != draft.child_id).map(|child| html! {
                        <option value={child.id.clone()} selected={child.id == selected}>
                            {&child.name}
                        </option>
                    })}
                </select>
            </div>
        }
    };

    html! {
        <section class="form-section incident-flags-section">
            <h3>{"Additional Information"}</h3>

            <label class="checkbox">
                <input
                    type="checkbox"
                    checked={draft.is_bite}
                    onchange={checkbox(&props.on_bite_change)}
                    disabled={props.disabled}
                />
                {" This was a bite"}
            </label>
            {if draft.is_bite {
                other_child_select(DraftField::BiterChild, "Which child bit?")
            } else { html! {} }}

            <label class="checkbox">
                <input
                    type="checkbox"
                    checked={draft.is_peer_aggression}
                    onchange={checkbox(&props.on_peer_aggression_change)}
                    disabled={props.disabled}
                />
                {" Another child was involved (peer aggression)"}
            </label>
            {if draft.is_peer_aggression {
                other_child_select(DraftField::AggressorChild, "Which child was involved?")
            } else { html! {} }}
        </section>
    }
}
