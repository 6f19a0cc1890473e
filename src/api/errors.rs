//! # Manejo de errores del cliente
//!
//! Jerarquía de errores con `thiserror`. La capa de operaciones remotas no
//! reclasifica nada: los errores de transporte y las respuestas HTTP no
//! exitosas llegan tal cual al llamador, y solo las pantallas los convierten
//! en un [`Notice`](crate::notice::Notice).

use reqwest::StatusCode;
use thiserror::Error;

/// Longitud máxima del cuerpo de respuesta que se conserva en un error HTTP
const MAX_BODY_CHARS: usize = 200;

/// Tipos de error del cliente
#[derive(Error, Debug)]
pub enum AppError {
    /// Fallo de red o de transporte (DNS, conexión rechazada, TLS...)
    #[error("Error de transporte en operación '{operation}': {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// El servidor respondió con un estado distinto de 2xx
    #[error("Respuesta HTTP {status} en operación '{operation}': {body}")]
    Http {
        operation: String,
        status: StatusCode,
        body: String,
    },

    /// El cuerpo recibido o guardado no es el JSON esperado
    #[error("Error decodificando JSON en operación '{operation}': {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// Error leyendo o escribiendo el almacenamiento local
    #[error("Error de almacenamiento en operación '{operation}': {source}")]
    Storage {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Error de validación con campo específico
    #[error("Error de validación en campo '{field}': {message}")]
    ValidationWithField { field: String, message: String },

    /// Error de validación general
    #[error("Error de validación: {0}")]
    Validation(String),

    /// Configuración inválida
    #[error("Configuración inválida: {0}")]
    Config(String),
}

impl AppError {
    pub fn transport(operation: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error HTTP recortando el cuerpo de la respuesta
    pub fn http(operation: &str, status: StatusCode, body: &str) -> Self {
        Self::Http {
            operation: operation.to_string(),
            status,
            body: body.chars().take(MAX_BODY_CHARS).collect(),
        }
    }

    pub fn decode(operation: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn storage(operation: &str, source: std::io::Error) -> Self {
        Self::Storage {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de validación con campo específico
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::ValidationWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Estado HTTP de la respuesta, si el error proviene del servidor
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// `true` cuando el servidor señala un conflicto explícito (409)
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub trait ResultExt<T> {
    fn map_err_storage(self, operation: &str) -> AppResult<T>;
}

impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn map_err_storage(self, operation: &str) -> AppResult<T> {
        self.map_err(|e| AppError::storage(operation, e))
    }
}
