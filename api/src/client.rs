//! HTTP client for the devotee booking endpoints

use crate::{
    config::ApiConfig,
    error::ApiError,
    session::SessionStore,
    types::{Booking, CreateBookingRequest, Priest},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Typed client for the priest-booking backend
///
/// Wraps three endpoints: priest details, booking creation, and the
/// devotee's bookings list. Every request is stamped with the session's
/// bearer token when one is available; a failed token read is logged and
/// the request goes out unauthenticated (the server then answers 401).
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client from configuration and a session store
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ApiConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url,
            session,
        })
    }

    /// Fetch a priest's profile with their ceremony catalog and prices
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    #[tracing::instrument(skip(self), name = "api_priest_details")]
    pub async fn priest_details(&self, priest_id: &str) -> Result<Priest, ApiError> {
        let url = format!("{}/api/devotee/priests/{priest_id}", self.base_url);
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(map_transport)?;

        decode(response).await
    }

    /// Create a booking from the merged draft and payment receipt
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    #[tracing::instrument(skip(self, request), name = "api_create_booking")]
    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<Booking, ApiError> {
        let url = format!("{}/api/devotee/bookings", self.base_url);
        let response = self
            .authorized(self.client.post(url))
            .json(request)
            .send()
            .await
            .map_err(map_transport)?;

        decode(response).await
    }

    /// Fetch the signed-in devotee's bookings
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    #[tracing::instrument(skip(self), name = "api_devotee_bookings")]
    pub async fn devotee_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let url = format!("{}/api/devotee/bookings", self.base_url);
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(map_transport)?;

        decode(response).await
    }

    /// Attach the session bearer token when one can be read
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(error) => {
                tracing::warn!(%error, "Failed to read session token, sending request without it");
                request
            },
        }
    }
}

/// Map a reqwest transport error, distinguishing the timeout case
fn map_transport(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::TimedOut
    } else {
        ApiError::RequestFailed(error.to_string())
    }
}

/// Decode a response, turning error statuses into typed errors
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body);
    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized { message }),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound { message }),
        _ => Err(ApiError::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

/// Pull the `message` field out of a JSON error body, if there is one
fn extract_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemorySession;

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_client_creation() {
        let client = ApiClient::new(
            ApiConfig::new("http://localhost:3000"),
            Arc::new(InMemorySession::signed_out()),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn extract_message_reads_json_body() {
        assert_eq!(
            extract_message(r#"{ "message": "Priest not found" }"#).as_deref(),
            Some("Priest not found")
        );
    }

    #[test]
    fn extract_message_handles_non_json_body() {
        assert_eq!(extract_message("Bad Gateway"), None);
        assert_eq!(extract_message(r#"{ "error": "nope" }"#), None);
    }
}
