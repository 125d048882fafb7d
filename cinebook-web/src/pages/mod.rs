pub mod home;
pub mod login;
pub mod movies;
pub mod my_bookings;
pub mod not_found;
pub mod payment;
pub mod seat_booking;
pub mod signup;

use wasm_bindgen::JsCast;
use yew::prelude::*;

/// Current value of the `<input>` that raised `e`.
pub(crate) fn input_value(e: &InputEvent) -> Option<String> {
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
}

/// Callback storing an input's value into `field`.
pub(crate) fn bind(field: &UseStateHandle<String>) -> Callback<InputEvent> {
    let field = field.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(value) = input_value(&e) {
            field.set(value);
        }
    })
}
