use shared::{Child, User, UserRole};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

/// The pick lists every view needs: children plus staff split by role
#[derive(Clone, PartialEq, Default)]
pub struct ReferenceData {
    pub children: Vec<Child>,
    pub teachers: Vec<User>,
    pub front_desk: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
}

#[hook]
pub fn use_reference_data(api_client: &ApiClient) -> ReferenceData {
    let data = use_state(|| ReferenceData { loading: true, ..ReferenceData::default() });

    use_effect_with((), {
        let api_client = api_client.clone();
        let data = data.clone();
        move |_| {
            spawn_local(async move {
                let children = api_client.list_children().await;
                let teachers = api_client.list_users(Some(UserRole::Teacher)).await;
                let front_desk = api_client.list_users(Some(UserRole::FrontDesk)).await;

                let mut loaded = ReferenceData::default();
                let mut errors = Vec::new();
                match children {
                    Ok(response) => loaded.children = response.children,
                    Err(e) => errors.push(e),
                }
                match teachers {
                    Ok(response) => loaded.teachers = response.users,
                    Err(e) => errors.push(e),
                }
                match front_desk {
                    Ok(response) => loaded.front_desk = response.users,
                    Err(e) => errors.push(e),
                }

                if !errors.is_empty() {
                    let message = errors.join("; ");
                    Logger::error_with_component("reference_data", &message);
                    loaded.error = Some(message);
                }
                data.set(loaded);
            });
            || ()
        }
    });

    (*data).clone()
}
