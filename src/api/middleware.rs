//! # Utilidades de logging para errores
//!
//! Registro de la cadena completa de `source()` de un error con `tracing`.

use std::error::Error as StdError;

/// Recorre la cadena de errores y devuelve cada eslabón como texto
fn collect_chain<E>(error: &E) -> Vec<String>
where
    E: StdError + 'static,
{
    let mut error_chain = Vec::new();
    let mut current_error: Option<&dyn StdError> = Some(error);

    while let Some(err) = current_error {
        error_chain.push(err.to_string());
        current_error = err.source();
    }

    error_chain
}

/// Registra la cadena completa de errores
///
/// # Parámetros
/// - `error`: Error a analizar y registrar
/// - `context`: Contexto opcional para añadir información
pub fn log_error_chain<E>(error: &E, context: Option<&str>)
where
    E: StdError + 'static,
{
    let error_chain = collect_chain(error);

    if let Some(ctx) = context {
        tracing::error!(
            context = %ctx,
            error_chain = ?error_chain,
            "Error with full chain (with context)"
        );
    } else {
        tracing::error!(error_chain = ?error_chain, "Error with full chain");
    }
}

/// Extension trait para Results que añade logging automático de error chains
///
/// ```ignore
/// client
///     .get_profile()
///     .await
///     .log_error_context("loading profile")?;
/// ```
pub trait ErrorLogExt<T, E> {
    /// Loggea la cadena de errores con contexto adicional
    fn log_error_context(self, context: &str) -> Result<T, E>;

    /// Loggea la cadena como advertencia, para fallos que la pantalla absorbe
    fn log_error_warn(self, context: &str) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, Some(context));
        }
        self
    }

    fn log_error_warn(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            tracing::warn!(
                context = %context,
                error_chain = ?collect_chain(error),
                "Warning with error chain"
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AppError;

    #[test]
    fn chain_includes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "session.json");
        let err = AppError::storage("load_session", io);
        let chain = collect_chain(&err);
        assert_eq!(chain.len(), 2);
        assert!(chain[0].contains("load_session"));
        assert_eq!(chain[1], "session.json");
    }

    #[test]
    fn logging_passes_result_through() {
        let ok: Result<u8, AppError> = Ok(3);
        assert_eq!(ok.log_error_context("noop").unwrap(), 3);

        let err: Result<u8, AppError> = Err(AppError::Validation("x".into()));
        assert!(err.log_error_warn("validation").is_err());
    }
}
