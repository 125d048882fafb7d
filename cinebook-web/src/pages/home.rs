use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or_default]
    pub user: Option<AttrValue>,
    #[prop_or_default]
    pub mock_mode: bool,
    pub on_browse: Callback<()>,
    pub on_my_bookings: Callback<()>,
}

#[function_component(HomePage)]
pub fn home_page(p: &Props) -> Html {
    let browse = {
        let cb = p.on_browse.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let bookings = {
        let cb = p.on_my_bookings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <section class="panel hero">
            <h1>{ "Book your next movie night" }</h1>
            if let Some(user) = p.user.clone() {
                <p class="welcome">{ format!("Welcome back, {user}!") }</p>
            }
            if p.mock_mode {
                <aside class="demo-notice" role="note">
                    <h2>{ "Demo Mode Active" }</h2>
                    <p>{ "The booking backend is not reachable, so movies, shows and bookings come from demo data." }</p>
                </aside>
            }
            <div class="hero-actions">
                <button type="button" class="btn-primary" onclick={browse}>{ "Browse Movies" }</button>
                if p.user.is_some() {
                    <button type="button" class="btn-secondary" onclick={bookings}>{ "My Bookings" }</button>
                }
            </div>
        </section>
    }
}
