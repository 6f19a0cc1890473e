//! # Almacén de sesión
//!
//! Persiste el token y el id de usuario en almacenamiento local duradero.
//! Sin expiración ni refresco: se guarda lo que devuelve el servidor y se
//! lee tal cual.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::models::Session;
use crate::api::{AppError, AppResult, ResultExt};

/// Almacenamiento clave-valor de la sesión
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Guarda la sesión, sobrescribiendo cualquier sesión previa
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Devuelve la sesión guardada, sin validar el token
    async fn load(&self) -> AppResult<Option<Session>>;

    /// Elimina token e id de usuario
    async fn clear(&self) -> AppResult<()>;
}

/// Sesión guardada en un fichero JSON
///
/// ```json
/// { "token": "abc", "userId": 42 }
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err_storage("create_session_dir")?;
            }
        }

        let data = serde_json::to_vec_pretty(session)
            .map_err(|e| AppError::decode("encode_session", e))?;

        // Escritura en fichero temporal + rename: nunca se lee una sesión a medias
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, data)
            .await
            .map_err_storage("write_session")?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err_storage("commit_session")?;

        tracing::debug!(path = %self.path.display(), "Sesión guardada");
        Ok(())
    }

    async fn load(&self) -> AppResult<Option<Session>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::storage("read_session", e)),
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| AppError::decode("load_session", e))
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage("clear_session", e)),
        }
    }
}

/// Sesión en memoria del proceso
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        // Un pánico mientras se sostiene el lock no deja datos a medias
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> AppResult<()> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    async fn load(&self) -> AppResult<Option<Session>> {
        Ok(self.slot().clone())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Contexto de sesión que se pasa explícitamente a quien llama a la API.
///
/// Es la única vía de lectura y escritura del almacén; se clona barato.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileSessionStore::new(path)))
    }

    pub async fn current(&self) -> AppResult<Option<Session>> {
        self.store.load().await
    }

    pub async fn token(&self) -> AppResult<Option<String>> {
        Ok(self.current().await?.map(|s| s.token))
    }

    pub async fn user_id(&self) -> AppResult<Option<i64>> {
        Ok(self.current().await?.map(|s| s.user_id))
    }

    pub async fn is_authenticated(&self) -> AppResult<bool> {
        Ok(self.token().await?.is_some_and(|t| !t.is_empty()))
    }

    /// Inicia sesión localmente tras un login o registro exitoso
    pub async fn begin(&self, token: &str, user_id: i64) -> AppResult<()> {
        self.store
            .save(&Session {
                token: token.to_string(),
                user_id,
            })
            .await?;
        tracing::info!(user_id, "Sesión iniciada");
        Ok(())
    }

    pub async fn end(&self) -> AppResult<()> {
        self.store.clear().await?;
        tracing::info!("Sesión cerrada");
        Ok(())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}
