// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio: ni reintentos, ni backoff, ni cola offline.
// Los viewmodels dependen del trait `CrossingApi`, no del cliente concreto.
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{CrossingSummary, PingAck, PingRequest, UnreadCountResponse};
use crate::utils::storage::{bearer_header, load_token};

/// Servicio remoto de cruces
#[async_trait(?Send)]
pub trait CrossingApi {
    /// `POST /crossings/ping`
    async fn send_ping(&self, request: &PingRequest) -> Result<PingAck, ApiError>;

    /// `GET /crossings/` (orden del backend, sin tocar)
    async fn fetch_crossings(&self) -> Result<Vec<CrossingSummary>, ApiError>;

    /// `GET /notifications/unread-count`
    async fn fetch_unread_count(&self) -> Result<u32, ApiError>;
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self { config: config.clone() }
    }

    fn authorization() -> Result<String, ApiError> {
        load_token()
            .map(|token| bearer_header(&token))
            .ok_or(ApiError::MissingToken)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if !response.ok() {
            let status = response.status();
            let message = match response.text().await {
                Ok(body) => error_message(&body, &response.status_text()),
                Err(_) => response.status_text(),
            };
            return Err(ApiError::Http { status, message });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.api_url(path);
        let response = Request::get(&url)
            .header("Authorization", &Self::authorization()?)
            .send()
            .await?;
        Self::read_json(response).await
    }
}

/// El backend responde `{"detail": ...}` en los errores; si no, el cuerpo tal cual
fn error_message(body: &str, status_text: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());
    match detail {
        Some(serde_json::Value::String(detail)) => detail,
        Some(other) => other.to_string(),
        None if body.trim().is_empty() => status_text.to_string(),
        None => body.trim().to_string(),
    }
}

#[async_trait(?Send)]
impl CrossingApi for ApiClient {
    async fn send_ping(&self, request: &PingRequest) -> Result<PingAck, ApiError> {
        let url = self.config.api_url("/crossings/ping");
        let response = Request::post(&url)
            .header("Authorization", &Self::authorization()?)
            .json(request)
            .map_err(|e| ApiError::Serialization(e.to_string()))?
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn fetch_crossings(&self) -> Result<Vec<CrossingSummary>, ApiError> {
        self.get_json("/crossings/").await
    }

    async fn fetch_unread_count(&self) -> Result<u32, ApiError> {
        let body: UnreadCountResponse = self.get_json("/notifications/unread-count").await?;
        Ok(body.count)
    }
}
