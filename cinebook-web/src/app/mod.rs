//! Application shell: routing, shared state and the per-route screens.
#[cfg(target_arch = "wasm32")]
mod screens;
#[cfg(target_arch = "wasm32")]
mod state;

#[cfg(target_arch = "wasm32")]
pub use state::AppState;

#[cfg(target_arch = "wasm32")]
use crate::components::navbar::Navbar;
#[cfg(target_arch = "wasm32")]
use crate::router::Route;
#[cfg(target_arch = "wasm32")]
use cinebook_core::CatalogGateway;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let state = state::use_app_state();
    let navigator = use_navigator();
    let route = use_route::<Route>().unwrap_or(Route::NotFound);

    {
        let gateway = state.services.gateway.clone();
        use_effect_with((*state.session).clone(), move |session| {
            gateway.set_token(session.token());
            || ()
        });
    }

    let on_navigate = Callback::from(move |route: Route| {
        if let Some(nav) = navigator.as_ref() {
            nav.push(&route);
        }
    });
    let on_logout = {
        let session = state.session.clone();
        let store = state.services.store;
        let on_navigate = on_navigate.clone();
        Callback::from(move |()| {
            let mut next = (*session).clone();
            if let Err(err) = next.sign_out(&store) {
                crate::dom::console_error(&format!("sign-out: {err}"));
            }
            session.set(next);
            on_navigate.emit(Route::Home);
        })
    };
    let user = state
        .session
        .user()
        .map(|user| AttrValue::from(user.username.clone()));

    html! {
        <>
            <Navbar
                active={route.clone()}
                {user}
                mock_mode={*state.mock_mode}
                on_navigate={on_navigate.clone()}
                {on_logout}
            />
            <main id="main">
                { screens::render(&state, &route, &on_navigate) }
            </main>
        </>
    }
}
