//! Remote simulate call.
//!
//! Posts the simulate request body and hands back the response text.
//! The document is not involved once the body has been built.

use bb_core::simulate::SIMULATE_PATH;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

fn js_error(context: &str, e: JsValue) -> String {
    match e.as_string() {
        Some(msg) => format!("{context}: {msg}"),
        None => format!("{context}: {e:?}"),
    }
}

/// POST `body` to `<base_url>/api/simulate`. Returns the response body on a
/// 2xx status, otherwise a user-facing error message.
pub async fn post_simulate(base_url: String, body: String) -> Result<String, String> {
    let window = web_sys::window().ok_or("No window object")?;

    let init = web_sys::RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));

    let url = format!("{}{SIMULATE_PATH}", base_url.trim_end_matches('/'));
    let request = web_sys::Request::new_with_str_and_init(&url, &init)
        .map_err(|e| js_error("Invalid request", e))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| js_error("Invalid header", e))?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| js_error("Simulation request failed", e))?
        .dyn_into::<web_sys::Response>()
        .map_err(|_| "Unexpected fetch result")?;

    if !response.ok() {
        return Err(format!(
            "Simulation failed: HTTP {} {}",
            response.status(),
            response.status_text()
        ));
    }

    let text = response
        .text()
        .map_err(|e| js_error("Unreadable response", e))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| js_error("Unreadable response", e))?;
    Ok(text.as_string().unwrap_or_default())
}
