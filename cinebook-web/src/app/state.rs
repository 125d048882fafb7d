use cinebook_core::{Session, Show};
use yew::prelude::*;

use crate::services::Services;

/// State shared by every screen for the lifetime of the page.
#[derive(Clone, PartialEq)]
pub struct AppState {
    pub services: Services,
    pub session: UseStateHandle<Session>,
    pub mock_mode: UseStateHandle<bool>,
    /// Backend show picked on the catalog; its booked seats drive the seat map.
    pub remote_show: UseStateHandle<Option<Show>>,
}

#[hook]
pub fn use_app_state() -> AppState {
    let services = use_memo((), |()| Services::from_env());
    let services = (*services).clone();
    let store = services.store;
    AppState {
        mock_mode: use_state(|| true),
        session: use_state(move || Session::hydrate(&store)),
        remote_show: use_state(|| None::<Show>),
        services,
    }
}
