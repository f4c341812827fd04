use shared::{FrontDeskAction, InjuryReportDetails};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "front_desk";

#[derive(Clone, PartialEq)]
pub struct FrontDeskState {
    pub reports: Vec<InjuryReportDetails>,
    pub only_unreviewed: bool,
    pub loading: bool,
    /// A review or delivery request is outstanding
    pub pending: bool,
    pub error: Option<String>,
}

pub struct UseFrontDeskResult {
    pub state: FrontDeskState,
    pub actions: FrontDeskActions,
}

#[derive(Clone, PartialEq)]
pub struct FrontDeskActions {
    pub refresh: Callback<()>,
    pub set_only_unreviewed: Callback<bool>,
    /// (action, report id, staff user id, called once the request finishes)
    pub perform: Callback<(FrontDeskAction, String, String, Callback<bool>)>,
}

#[hook]
pub fn use_front_desk(api_client: &ApiClient) -> UseFrontDeskResult {
    let reports = use_state(Vec::<InjuryReportDetails>::new);
    let only_unreviewed = use_state(|| false);
    let loading = use_state(|| false);
    let pending = use_state(|| false);
    let error = use_state(|| Option::<String>::None);

    let load = {
        let api_client = api_client.clone();
        let reports = reports.clone();
        let loading = loading.clone();
        let error = error.clone();
        Callback::from(move |only_unreviewed: bool| {
            let api_client = api_client.clone();
            let reports = reports.clone();
            let loading = loading.clone();
            let error = error.clone();
            spawn_local(async move {
                loading.set(true);
                match api_client.list_reports(only_unreviewed).await {
                    Ok(response) => {
                        reports.set(response.reports);
                        error.set(None);
                    }
                    Err(e) => {
                        Logger::error_with_component(COMPONENT, &format!("Failed to load reports: {}", e));
                        error.set(Some(e));
                    }
                }
                loading.set(false);
            });
        })
    };

    use_effect_with(*only_unreviewed, {
        let load = load.clone();
        move |only_unreviewed| {
            load.emit(*only_unreviewed);
            || ()
        }
    });

    let refresh = {
        let load = load.clone();
        let only_unreviewed = only_unreviewed.clone();
        Callback::from(move |_| load.emit(*only_unreviewed))
    };

    let set_only_unreviewed = {
        let only_unreviewed = only_unreviewed.clone();
        Callback::from(move |value: bool| only_unreviewed.set(value))
    };

    let perform = {
        let api_client = api_client.clone();
        let pending = pending.clone();
        let error = error.clone();
        let refresh = refresh.clone();
        Callback::from(
            move |(action, report_id, user_id, done): (FrontDeskAction, String, String, Callback<bool>)| {
                let api_client = api_client.clone();
                let pending = pending.clone();
                let error = error.clone();
                let refresh = refresh.clone();
                pending.set(true);
                spawn_local(async move {
                    let result = match action {
                        FrontDeskAction::MarkReviewed => api_client.mark_reviewed(&report_id, &user_id).await,
                        FrontDeskAction::MarkDelivered => api_client.mark_delivered(&report_id, &user_id).await,
                    };
                    pending.set(false);
                    match result {
                        Ok(_) => {
                            Logger::info_with_component(
                                COMPONENT,
                                &format!("{:?} on report {} by {}", action, report_id, user_id),
                            );
                            error.set(None);
                            done.emit(true);
                            refresh.emit(());
                        }
                        Err(e) => {
                            Logger::error_with_component(COMPONENT, &format!("{:?} failed: {}", action, e));
                            error.set(Some(e));
                            done.emit(false);
                        }
                    }
                });
            },
        )
    };

    UseFrontDeskResult {
        state: FrontDeskState {
            reports: (*reports).clone(),
            only_unreviewed: *only_unreviewed,
            loading: *loading,
            pending: *pending,
            error: (*error).clone(),
        },
        actions: FrontDeskActions { refresh, set_only_unreviewed, perform },
    }
}
