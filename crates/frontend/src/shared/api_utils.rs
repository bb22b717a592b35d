//! API utilities for frontend-backend communication
//!
//! The base URL is resolved once at startup and handed to every page through
//! context as an [`ApiClient`]. Requests attach the stored bearer token when
//! there is one and map every failure onto [`ApiError`].

use contracts::shared::api_error::ApiError;
use gloo_net::http::{Request, RequestBuilder, Response};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::FormData;

use crate::system::auth::storage;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// `<meta name="api-base-url" content="...">` overrides the default.
const BASE_URL_META: &str = "meta[name=\"api-base-url\"]";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL from the host page, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_document() -> Self {
        let configured = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(BASE_URL_META).ok().flatten())
            .and_then(|el| el.dyn_into::<web_sys::HtmlMetaElement>().ok())
            .map(|meta| meta.content())
            .filter(|url| !url.trim().is_empty());
        match configured {
            Some(url) => Self::new(url),
            None => Self::new(DEFAULT_BASE_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full API URL from a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match storage::get_access_token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let result = self.authorized(Request::get(&self.url(path))).send().await;
        read_json(result).await
    }

    pub async fn put_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let result = self.authorized(Request::put(&self.url(path))).send().await;
        read_json(result).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let result = self.authorized(Request::delete(&self.url(path))).send().await;
        read_json(result).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorized(Request::post(&self.url(path)))
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        read_json(request.send().await).await
    }

    /// Multipart POST. The raw response is returned so callers can read
    /// error bodies that carry more than a `detail`.
    pub async fn post_form(&self, path: &str, form: FormData) -> Result<Response, ApiError> {
        let request = self
            .authorized(Request::post(&self.url(path)))
            .body(form)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Multipart POST of text fields with a JSON answer.
    pub async fn post_fields<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(String, String)],
    ) -> Result<T, ApiError> {
        let form = form_data(fields)?;
        read_json(Ok(self.post_form(path, form).await?)).await
    }
}

/// Decodes a 2xx body, or turns anything else into an [`ApiError`].
pub async fn read_json<T: DeserializeOwned>(
    result: Result<Response, gloo_net::Error>,
) -> Result<T, ApiError> {
    let response = result.map_err(|e| ApiError::Network(e.to_string()))?;
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(response.status(), &body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Builds multipart form data from text fields.
pub fn form_data(fields: &[(String, String)]) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(|e| ApiError::Network(format!("{:?}", e)))?;
    for (name, value) in fields {
        form.append_with_str(name, value)
            .map_err(|e| ApiError::Network(format!("{:?}", e)))?;
    }
    Ok(form)
}

/// Provides the client to the component tree.
pub fn provide_api_client(client: ApiClient) {
    provide_context(client);
}

/// API client from context, resolved from the document when missing.
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_else(ApiClient::from_document)
}

/// Client stored by a page, or `None` once that page has been torn down.
/// Work resumed after an `await` must go through this.
pub fn live_client(api: StoredValue<ApiClient>) -> Option<ApiClient> {
    api.try_get_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_live_client_after_page_teardown() {
        let owner = Owner::new();
        let api = owner.with(|| StoredValue::new(ApiClient::new(DEFAULT_BASE_URL)));
        assert_eq!(live_client(api), Some(ApiClient::new(DEFAULT_BASE_URL)));

        owner.cleanup();
        assert!(live_client(api).is_none());
    }
}
