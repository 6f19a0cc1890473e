//! # Cliente HTTP
//!
//! Un único `reqwest::Client` con dirección base y cabeceras JSON por defecto.
//! Cada petición pasa por [`ApiClient::authorize`], que añade
//! `Authorization: Bearer <token>` cuando hay un token guardado en la sesión.
//!
//! Sin reintentos, sin caché y sin timeouts propios: se usan los valores por
//! defecto del transporte.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::{AppError, AppResult};
use crate::config::normalize_api_url;
use crate::db::SessionContext;

/// Cabecera de correlación enviada con cada petición
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    /// Crea el cliente para la dirección base indicada
    ///
    /// # Errores
    /// - `Config`: la URL base no es http(s) válida
    /// - `Transport`: no se pudo construir el cliente HTTP
    pub fn new(base_url: &str, session: SessionContext) -> AppResult<Self> {
        let base_url = normalize_api_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::transport("build_client", e))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Contexto de sesión compartido con las pantallas
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(crate) async fn get<T>(&self, operation: &str, path: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path);
        self.send(operation, request).await
    }

    pub(crate) async fn get_with_query<T>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path).query(query);
        self.send(operation, request).await
    }

    pub(crate) async fn post<B, T>(&self, operation: &str, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.send(operation, request).await
    }

    pub(crate) async fn post_empty<T>(&self, operation: &str, path: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path);
        self.send(operation, request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Interceptor: añade el token Bearer si existe
    async fn authorize(&self, request: RequestBuilder) -> AppResult<RequestBuilder> {
        match self.session.token().await? {
            Some(token) if !token.is_empty() => Ok(request.bearer_auth(token)),
            _ => Ok(request),
        }
    }

    async fn send<T>(&self, operation: &str, request: RequestBuilder) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let request_id = Uuid::new_v4().to_string();
        let request = self
            .authorize(request)
            .await?
            .header(REQUEST_ID_HEADER, request_id.as_str());

        tracing::debug!(operation = %operation, request_id = %request_id, "Enviando petición");

        let response = request
            .send()
            .await
            .map_err(|e| AppError::transport(operation, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::transport(operation, e))?;

        if !status.is_success() {
            tracing::debug!(
                operation = %operation,
                request_id = %request_id,
                status = %status,
                "Respuesta no exitosa"
            );
            return Err(AppError::http(operation, status, &body));
        }

        decode_body(operation, &body)
    }
}

/// Decodifica el cuerpo JSON; un cuerpo vacío se interpreta como `null`
fn decode_body<T>(operation: &str, body: &str) -> AppResult<T>
where
    T: DeserializeOwned,
{
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| AppError::decode(operation, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn empty_body_decodes_as_null() {
        let value: Value = decode_body("logout", "").unwrap();
        assert_eq!(value, Value::Null);

        let value: Option<u32> = decode_body("logout", "  ").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = decode_body::<Vec<u32>>("list_procedures", "{oops").unwrap_err();
        assert!(matches!(err, AppError::Decode { ref operation, .. } if operation == "list_procedures"));
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:5173/", SessionContext::in_memory()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5173");
        assert!(ApiClient::new("localhost", SessionContext::in_memory()).is_err());
    }
}
