//! Browser frontend for the IMDb top-movies scraper.
//!
//! Attaches a submit handler to the scrape parameter form, POSTs the field
//! values to the server as JSON and reflects the reply in two page regions:
//! the chart image and the download-link container.

pub mod backend;
pub mod form;
pub mod protocol;
mod utils;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, console};

use backend::Backend;
use form::ScraperForm;
use utils::set_panic_hook;

#[wasm_bindgen]
pub struct ScraperApp {}

#[wasm_bindgen]
impl ScraperApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ScraperApp {
        set_panic_hook();
        ScraperApp {}
    }

    /// Wire the submit listener onto the scrape form.
    ///
    /// Each submission reads the controls as they are at that moment, sends
    /// one request and applies the reply to the page. Submissions are not
    /// serialized or debounced: every gesture spawns an independent task, and
    /// updates land in response-arrival order, so a slow earlier response can
    /// overwrite a faster later one.
    #[wasm_bindgen]
    pub fn attach(&self) -> Result<(), JsValue> {
        let window = web_sys::window().expect("Unable to load window");
        let document = window.document().expect("Window has no document");

        let surface = ScraperForm::locate(document)?;
        let target = surface.form()?;

        let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            // The handler, not the browser, dispatches the request.
            event.prevent_default();

            let surface = surface.clone();
            spawn_local(async move {
                if let Err(err) = run_submission(&surface).await {
                    console::error_2(&"Scrape submission failed: ".into(), &err);
                }
            });
        });

        target.add_event_listener_with_callback("submit", handler.as_ref().unchecked_ref())?;

        // The listener lives for the rest of the page's lifetime.
        handler.forget();
        Ok(())
    }
}

async fn run_submission(surface: &ScraperForm) -> Result<(), JsValue> {
    let request = surface.read_request()?;
    let export_format = request.export.clone();

    let response = Backend::scrape(&request).await?;
    surface.render(&response, &export_format)
}

#[wasm_bindgen]
#[derive(Debug)]
pub struct ScrapeError {
    kind: ScrapeErrorKind,
    msg: String,
}

impl ScrapeError {
    pub(crate) fn new(kind: ScrapeErrorKind, msg: String) -> ScrapeError {
        ScrapeError { kind, msg }
    }
}

#[wasm_bindgen]
impl ScrapeError {
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> ScrapeErrorKind {
        self.kind
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.msg.clone()
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(error: serde_json::Error) -> ScrapeError {
        ScrapeError {
            kind: ScrapeErrorKind::DecodeError,
            msg: format!("Error decoding response: {error}"),
        }
    }
}

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeErrorKind {
    /// The request body could not be serialized.
    EncodingError,
    /// The request could not be completed.
    RequestError,
    /// The response body was not valid JSON for the contract.
    DecodeError,
    /// An expected page element is absent or of the wrong type.
    MissingElement,
}
