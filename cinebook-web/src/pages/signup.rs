use cinebook_core::gateway::SignupRequest;
use cinebook_core::session::SignupForm;
use yew::prelude::*;

use super::bind;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or_default]
    pub busy: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    pub on_submit: Callback<SignupRequest>,
    pub on_login: Callback<()>,
}

#[function_component(SignupPage)]
pub fn signup_page(p: &Props) -> Html {
    let username = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let password_confirm = use_state(String::new);
    let problem = use_state(|| None::<&'static str>);

    let submit = {
        let cb = p.on_submit.clone();
        let form = SignupForm {
            username: (*username).clone(),
            email: (*email).clone(),
            password: (*password).clone(),
            password_confirm: (*password_confirm).clone(),
        };
        let problem = problem.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match form.validate() {
                Ok(request) => {
                    problem.set(None);
                    cb.emit(request);
                }
                Err(message) => problem.set(Some(message)),
            }
        })
    };
    let login = {
        let cb = p.on_login.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    let error = (*problem).map(AttrValue::from).or_else(|| p.error.clone());
    html! {
        <section class="panel auth">
            <h1>{ "Create an account" }</h1>
            if let Some(error) = error {
                <p class="error" role="alert">{ error }</p>
            }
            <form onsubmit={submit}>
                <label for="signup-username">{ "Username" }</label>
                <input id="signup-username" type="text" autocomplete="username" required={true}
                    value={(*username).clone()} oninput={bind(&username)} />
                <label for="signup-email">{ "Email" }</label>
                <input id="signup-email" type="email" autocomplete="email" required={true}
                    value={(*email).clone()} oninput={bind(&email)} />
                <label for="signup-password">{ "Password" }</label>
                <input id="signup-password" type="password" autocomplete="new-password" required={true}
                    value={(*password).clone()} oninput={bind(&password)} />
                <label for="signup-confirm">{ "Confirm password" }</label>
                <input id="signup-confirm" type="password" autocomplete="new-password" required={true}
                    value={(*password_confirm).clone()} oninput={bind(&password_confirm)} />
                <button type="submit" class="btn-primary" disabled={p.busy}>
                    { if p.busy { "Creating account..." } else { "Sign Up" } }
                </button>
            </form>
            <p>{ "Already registered? " }<a href="/login" onclick={login}>{ "Sign in" }</a></p>
        </section>
    }
}
