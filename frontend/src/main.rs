use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::front_desk_view::FrontDeskView;
use components::memo_view::MemoView;
use components::teacher_form::TeacherForm;
use hooks::use_reference_data::use_reference_data;
use services::api::ApiClient;

/// Which screen is showing. There is no login; staff pick the screen they need.
#[derive(Clone, PartialEq)]
enum Page {
    TeacherForm,
    FrontDesk,
    Memo { report_id: String },
}

#[function_component(App)]
fn app() -> Html {
    let api_client = use_memo((), |_| ApiClient::new());
    let reference = use_reference_data(&api_client);
    let page = use_state(|| Page::TeacherForm);

    let go_to = |target: Page| {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| page.set(target.clone()))
    };

    let on_view_memo = {
        let page = page.clone();
        Callback::from(move |report_id: String| page.set(Page::Memo { report_id }))
    };

    let on_back_from_memo = {
        let page = page.clone();
        Callback::from(move |_| page.set(Page::FrontDesk))
    };

    let content = match &*page {
        Page::TeacherForm => html! {
            <TeacherForm api_client={(*api_client).clone()} reference={reference.clone()} />
        },
        Page::FrontDesk => html! {
            <FrontDeskView
                api_client={(*api_client).clone()}
                reference={reference.clone()}
                on_view_memo={on_view_memo}
            />
        },
        Page::Memo { report_id } => html! {
            <MemoView
                api_client={(*api_client).clone()}
                report_id={report_id.clone()}
                on_back={on_back_from_memo}
            />
        },
    };

    html! {
        <div class="app">
            <nav class="app-nav no-print">
                <span class="app-title">{"Boo-Boo Reports"}</span>
                <button
                    class={classes!("nav-tab", (*page == Page::TeacherForm).then_some("active"))}
                    onclick={go_to(Page::TeacherForm)}
                >
                    {"Teacher"}
                </button>
                <button
                    class={classes!("nav-tab", (*page == Page::FrontDesk).then_some("active"))}
                    onclick={go_to(Page::FrontDesk)}
                >
                    {"Front Desk"}
                </button>
            </nav>
            <main>
                {if reference.loading {
                    html! { <p class="loading">{"Loading..."}</p> }
                } else {
                    content
                }}
            </main>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
