//! Configuración del cliente desde variables de entorno (archivo `.env`).
//!
//! ```env
//! MELNIZ_API_URL=http://192.168.0.48:5173
//! MELNIZ_SESSION_FILE=/home/user/.local/share/melniz/session.json
//! MELNIZ_SPEND_POLICY=all
//! RUST_LOG=melniz_client=debug
//! ```

use std::env;
use std::path::PathBuf;

use crate::api::{AppError, AppResult};
use crate::profile::SpendPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub spend_policy: SpendPolicy,
}

impl Config {
    /// Carga `.env` (si existe) y lee la configuración del entorno
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de
    /// variables, para poder probarla sin tocar el entorno del proceso.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("MELNIZ_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = normalize_api_url(&api_url)?;

        let session_file = lookup("MELNIZ_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_session_file);

        let spend_policy = match lookup("MELNIZ_SPEND_POLICY") {
            Some(raw) => raw.parse().map_err(|_| {
                AppError::validation_field("MELNIZ_SPEND_POLICY", "use 'all' o 'completed'")
            })?,
            None => SpendPolicy::default(),
        };

        Ok(Config {
            api_url,
            session_file,
            spend_policy,
        })
    }
}

/// Valida la URL base y elimina la barra final
pub fn normalize_api_url(raw: &str) -> AppResult<String> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|e| AppError::Config(format!("MELNIZ_API_URL '{}': {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "MELNIZ_API_URL debe ser http o https: '{}'",
            raw
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn default_session_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("melniz"))
        .unwrap_or_else(|| PathBuf::from(".melniz"))
        .join("session.json")
}
