//! Navegación entre la zona pública (autenticación) y la privada.
//!
//! La decisión depende solo de si hay un token guardado en la sesión.

use std::fmt;

use crate::api::middleware::ErrorLogExt;
use crate::api::{ApiClient, AppResult};
use crate::db::{AuthResponse, Registration, SessionContext};
use crate::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Procedures,
    Profile,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Home => "Главная",
            Tab::Procedures => "Услуги",
            Tab::Profile => "Профиль",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth,
    Main(Tab),
    Appointment,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Auth => write!(f, "Auth"),
            Route::Main(tab) => write!(f, "{}", tab.title()),
            Route::Appointment => write!(f, "Appointment"),
        }
    }
}

/// Pantalla inicial según la sesión guardada
pub async fn initial_route(session: &SessionContext) -> AppResult<Route> {
    if session.is_authenticated().await? {
        Ok(Route::Main(Tab::Home))
    } else {
        Ok(Route::Auth)
    }
}

/// Abre la pantalla de reserva de un procedimiento.
///
/// La reserva necesita el `userId` guardado; sin sesión completa se vuelve a
/// la pantalla de autenticación.
pub async fn open_booking(session: &SessionContext) -> AppResult<Route> {
    if session.is_authenticated().await? && session.user_id().await?.is_some() {
        Ok(Route::Appointment)
    } else {
        tracing::info!("Reserva sin sesión, se pide autenticación");
        Ok(Route::Auth)
    }
}

/// Formulario de la pantalla de autenticación
#[derive(Debug, Clone)]
pub enum AuthRequest {
    Login { email: String, password: String },
    Register(Registration),
}

/// Login o registro desde la pantalla de autenticación.
///
/// Cualquier fallo se muestra como un único aviso genérico.
pub async fn authenticate(api: &ApiClient, request: &AuthRequest) -> Result<Route, Notice> {
    let result: AppResult<AuthResponse> = match request {
        AuthRequest::Login { email, password } => api.login(email, password).await,
        AuthRequest::Register(registration) => api.register(registration).await,
    };

    result
        .log_error_context("authenticating")
        .map(|_| Route::Main(Tab::Home))
        .map_err(|_| Notice::AuthFailed)
}

/// Cierra sesión en el servidor y después localmente.
///
/// Si la llamada al servidor falla la sesión local se conserva.
pub async fn sign_out(api: &ApiClient) -> AppResult<Route> {
    api.logout().await.log_error_context("logging out")?;
    api.session().end().await?;
    Ok(Route::Auth)
}
