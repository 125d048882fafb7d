use crate::router::Route;
use yew::prelude::*;
use yew_router::Routable;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub active: Route,
    /// Signed-in username, if any.
    #[prop_or_default]
    pub user: Option<AttrValue>,
    #[prop_or_default]
    pub mock_mode: bool,
    pub on_navigate: Callback<Route>,
    pub on_logout: Callback<()>,
}

/// Anchor that routes through `on_navigate` instead of reloading the page.
fn nav_link(route: Route, label: &'static str, props: &Props) -> Html {
    let class = if props.active == route {
        "nav-link active"
    } else {
        "nav-link"
    };
    let href = route.to_path();
    let onclick = {
        let cb = props.on_navigate.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            cb.emit(route.clone());
        })
    };
    html! { <a {class} {href} {onclick}>{ label }</a> }
}

#[function_component(Navbar)]
pub fn navbar(p: &Props) -> Html {
    let logout = {
        let cb = p.on_logout.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <header role="banner" class="navbar">
            <nav aria-label="Main" class="navbar-links">
                { nav_link(Route::Home, "CineBook", p) }
                { nav_link(Route::Movies, "Movies", p) }
                if p.user.is_some() {
                    { nav_link(Route::MyBookings, "My Bookings", p) }
                }
            </nav>
            if p.mock_mode {
                <span class="badge demo-badge" title="Backend unavailable, showing demo data">
                    { "Demo Mode" }
                </span>
            }
            <div class="navbar-account">
                if let Some(user) = p.user.clone() {
                    <span class="navbar-user">{ format!("Hi, {user}") }</span>
                    <button type="button" class="btn-link" onclick={logout}>{ "Logout" }</button>
                } else {
                    { nav_link(Route::Login, "Login", p) }
                    { nav_link(Route::Signup, "Sign Up", p) }
                }
            </div>
        </header>
    }
}
