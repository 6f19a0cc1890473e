//! # API de autenticación y perfil
//!
//! - Login y registro (guardan token e id de usuario en la sesión)
//! - Logout
//! - Perfil del usuario autenticado con sus citas

use serde_json::Value;

use super::{ApiClient, AppResult};
use crate::db::{AuthResponse, Credentials, Profile, Registration};

impl ApiClient {
    /// Inicia sesión con email y contraseña
    ///
    /// `POST /login` con `{ email, password }`. Tras una respuesta exitosa
    /// guarda `token` y `user.id` en la sesión, de modo que las peticiones
    /// siguientes van autenticadas sin volver a pasar el token.
    ///
    /// # Errores
    /// Cualquier error de transporte o HTTP se propaga sin clasificar.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthResponse> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.post("login", "/login", &credentials).await?;
        self.session().begin(&response.token, response.user.id).await?;
        Ok(response)
    }

    /// Registra un nuevo usuario
    ///
    /// `POST /register` con `{ name, phone, email, password }`. Igual que
    /// [`login`](Self::login), persiste la sesión devuelta.
    pub async fn register(&self, registration: &Registration) -> AppResult<AuthResponse> {
        let response: AuthResponse = self.post("register", "/register", registration).await?;
        self.session().begin(&response.token, response.user.id).await?;
        Ok(response)
    }

    /// `POST /logout`. No toca la sesión local; ver [`crate::navigation::sign_out`].
    pub async fn logout(&self) -> AppResult<Value> {
        self.post_empty("logout", "/logout").await
    }

    /// `GET /profile`: datos del usuario y sus citas
    pub async fn get_profile(&self) -> AppResult<Profile> {
        self.get("get_profile", "/profile").await
    }
}
