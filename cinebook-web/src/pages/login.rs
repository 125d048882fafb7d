use cinebook_core::gateway::Credentials;
use yew::prelude::*;

use super::bind;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or_default]
    pub busy: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    #[prop_or_default]
    pub mock_mode: bool,
    pub on_submit: Callback<Credentials>,
    pub on_signup: Callback<()>,
}

#[function_component(LoginPage)]
pub fn login_page(p: &Props) -> Html {
    let username = use_state(String::new);
    let password = use_state(String::new);
    let submit = {
        let cb = p.on_submit.clone();
        let username = username.clone();
        let password = password.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit(Credentials {
                username: username.trim().to_string(),
                password: (*password).clone(),
                email: None,
            });
        })
    };
    let signup = {
        let cb = p.on_signup.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    html! {
        <section class="panel auth">
            <h1>{ "Sign in" }</h1>
            if p.mock_mode {
                <p class="hint">{ "Demo mode: any username and password will do." }</p>
            }
            if let Some(error) = p.error.clone() {
                <p class="error" role="alert">{ error }</p>
            }
            <form onsubmit={submit}>
                <label for="login-username">{ "Username" }</label>
                <input id="login-username" type="text" autocomplete="username" required={true}
                    value={(*username).clone()} oninput={bind(&username)} />
                <label for="login-password">{ "Password" }</label>
                <input id="login-password" type="password" autocomplete="current-password" required={true}
                    value={(*password).clone()} oninput={bind(&password)} />
                <button type="submit" class="btn-primary" disabled={p.busy}>
                    { if p.busy { "Signing in..." } else { "Sign In" } }
                </button>
            </form>
            <p>{ "New here? " }<a href="/signup" onclick={signup}>{ "Create an account" }</a></p>
        </section>
    }
}
