use shared::{Child, DraftField, ReportDraft, User};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct BasicInfoSectionProps {
    pub draft: ReportDraft,
    pub children: Vec<Child>,
    pub teachers: Vec<User>,
    pub disabled: bool,
    pub on_edit: Callback<(DraftField, String)>,
}

fn on_select(field: DraftField, on_edit: &Callback<(DraftField, String)>) -> Callback<Event> {
    let on_edit = on_edit.clone();
    Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        on_edit.emit((field, select.value()));
    })
}

fn on_input(field: DraftField, on_edit: &Callback<(DraftField, String)>) -> Callback<Event> {
    let on_edit = on_edit.clone();
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_edit.emit((field, input.value()));
    })
}

/// Who, when and where
#[function_component(BasicInfoSection)]
pub fn basic_info_section(props: &BasicInfoSectionProps) -> Html {
    let draft = &props.draft;

    html! {
        <section class="form-section basic-info-section">
            <h3>{"Basic Information"}</h3>

            <div class="form-group">
                <label for="child">{"Child"}</label>
                <select
                    id="child"
                    onchange={on_select(DraftField::Child, &props.on_edit)}
                    disabled={props.disabled}
                >
                    <option value="" selected={draft.child_id.is_empty()}>{"Select a child"}</option>
                    {for props.children.iter().map(|child| html! {
                        <option value={child.id.clone()} selected={child.id == draft.child_id}>
                            {&child.name}
                        </option>
                    })}
                </select>
            </div>

            <div class="form-row">
                <div class="form-group">
                    <label for="injury-date">{"Date"}</label>
                    <input
                        id="injury-date"
                        type="date"
                        value={draft.injury_date.clone()}
                        onchange={on_input(DraftField::InjuryDate, &props.on_edit)}
                        disabled={props.disabled}
                    />
                </div>
                <div class="form-group">
                    <label for="injury-time">{"Time"}</label>
                    <input
                        id="injury-time"
                        type="time"
                        value={draft.injury_time.clone()}
                        onchange={on_input(DraftField::InjuryTime, &props.on_edit)}
                        disabled={props.disabled}
                    />
                </div>
            </div>

            <div class="form-group">
                <label for="location">{"Location"}</label>
                <input
                    id="location"
                    type="text"
                    placeholder="Playground, classroom, hallway..."
                    value={draft.location.clone()}
                    onchange={on_input(DraftField::Location, &props.on_edit)}
                    disabled={props.disabled}
                />
            </div>

            <div class="form-group">
                <label for="submitting-user">{"Your name"}</label>
                <select
                    id="submitting-user"
                    onchange={on_select(DraftField::SubmittingUser, &props.on_edit)}
                    disabled={props.disabled}
                >
                    <option value="" selected={draft.submitting_user_id.is_empty()}>{"Select your name"}</option>
                    {for props.teachers.iter().map(|user| html! {
                        <option value={user.id.clone()} selected={user.id == draft.submitting_user_id}>
                            {&user.name}
                        </option>
                    })}
                </select>
            </div>
        </section>
    }
}
