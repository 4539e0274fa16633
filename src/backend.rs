use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::protocol::{ScrapeRequest, ScrapeResponse};
use crate::{ScrapeError, ScrapeErrorKind};

/// The scrape endpoint is the serving origin itself.
const SCRAPE_ENDPOINT: &str = "/";

pub struct Backend;

impl Backend {
    /// Submit scrape parameters and decode the server's reply.
    ///
    /// The body is parsed as JSON regardless of the response status: the
    /// server signals "nothing to show" through absent fields, not through
    /// status codes.
    pub async fn scrape(request: &ScrapeRequest) -> Result<ScrapeResponse, JsValue> {
        Self::request_json(request, SCRAPE_ENDPOINT).await
    }

    async fn send_request<S>(request: &S, endpoint: &str) -> Result<Response, JsValue>
    where
        S: Serialize,
    {
        let request_headers = Headers::new()?;
        request_headers.append("Content-Type", "application/json")?;

        let request_config = RequestInit::new();
        request_config.set_method("POST");
        request_config.set_mode(RequestMode::Cors);
        request_config.set_headers(&request_headers);

        let body: JsValue = serde_json::to_string(request)
            .map_err(|err| {
                JsValue::from(ScrapeError::new(
                    ScrapeErrorKind::EncodingError,
                    format!("Error encoding request: {err}"),
                ))
            })?
            .into();
        request_config.set_body(&body);

        let request = Request::new_with_str_and_init(endpoint, &request_config)?;
        let window = web_sys::window().expect("Unable to load window");

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|err| {
                JsValue::from(ScrapeError::new(
                    ScrapeErrorKind::RequestError,
                    format!("Request to {endpoint} failed: {err:?}"),
                ))
            })?;

        let resp: Response = resp_value
            .dyn_into()
            .expect("Response value is not a Response");

        Ok(resp)
    }

    async fn request_json<S, D>(request: &S, endpoint: &str) -> Result<D, JsValue>
    where
        S: Serialize,
        D: DeserializeOwned,
    {
        let resp = Self::send_request(request, endpoint).await?;

        let body = resp.text().map_err(|err| Self::body_error(endpoint, &err))?;
        let resp_text = JsFuture::from(body)
            .await
            .map_err(|err| Self::body_error(endpoint, &err))?
            .as_string()
            .unwrap();

        serde_json::from_str(&resp_text).map_err(|err| JsValue::from(ScrapeError::from(err)))
    }

    fn body_error(endpoint: &str, err: &JsValue) -> JsValue {
        JsValue::from(ScrapeError::new(
            ScrapeErrorKind::RequestError,
            format!("Reading response from {endpoint} failed: {err:?}"),
        ))
    }
}
