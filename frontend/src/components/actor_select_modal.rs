use shared::{FrontDeskAction, User};
use web_sys::{HtmlSelectElement, MouseEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ActorSelectModalProps {
    pub action: FrontDeskAction,
    pub child_name: String,
    pub staff: Vec<User>,
    /// A request for this modal is outstanding
    pub pending: bool,
    pub on_confirm: Callback<String>,
    pub on_close: Callback<()>,
}

/// Asks which front-desk staff member is reviewing or delivering a report
#[function_component(ActorSelectModal)]
pub fn actor_select_modal(props: &ActorSelectModalProps) -> Html {
    let selected = use_state(String::new);

    let on_change = {
        let selected = selected.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            selected.set(select.value());
        })
    };

    let on_confirm = {
        let selected = selected.clone();
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| {
            if !selected.is_empty() {
                on_confirm.emit((*selected).clone());
            }
        })
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        let pending = props.pending;
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            if !pending {
                on_close.emit(());
            }
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal-backdrop" onclick={on_backdrop_click}>
            <div class="modal" onclick={on_modal_click}>
                <h3 class="modal-title">{props.action.title()}</h3>
                <p>{format!("Report for {}", props.child_name)}</p>

                <div class="form-group">
                    <label for="actor">{"Staff member"}</label>
                    <select id="actor" onchange={on_change} disabled={props.pending}>
                        <option value="" selected={selected.is_empty()}>{"Select your name"}</option>
                        {for props.staff.iter().map(|user| html! {
                            <option value={user.id.clone()} selected={user.id == *selected}>{&user.name}</option>
                        })}
                    </select>
                </div>

                <div class="modal-buttons">
                    <button
                        type="button"
                        class="btn btn-primary"
                        onclick={on_confirm}
                        disabled={props.pending || selected.is_empty()}
                    >
                        {if props.pending { "Saving..." } else { props.action.confirm_label() }}
                    </button>
                    <button type="button" class="btn btn-secondary" onclick={on_cancel} disabled={props.pending}>
                        {"Cancel"}
                    </button>
                </div>
            </div>
        </div>
    }
}
