//! # Módulo API
//!
//! Cliente de la API REST del salón. Cada operación corresponde a un único
//! endpoint y devuelve el cuerpo de la respuesta ya parseado.
//!
//! ## Módulos principales
//!
//! - [`client`] - Cliente HTTP e interceptor del token Bearer
//! - [`auth`] - Login, registro, logout y perfil
//! - [`catalog`] - Procedimientos, empleados y horarios
//! - [`appointment`] - Citas, reserva de franjas y reseñas
//! - [`errors`] - Manejo de errores de la aplicación
//!
//! ## Endpoints
//!
//! | Operación | Método | Ruta |
//! |---|---|---|
//! | [`ApiClient::login`] | POST | `/login` |
//! | [`ApiClient::register`] | POST | `/register` |
//! | [`ApiClient::logout`] | POST | `/logout` |
//! | [`ApiClient::get_profile`] | GET | `/profile` |
//! | [`ApiClient::list_procedures`] | GET | `/procedures` |
//! | [`ApiClient::list_employees`] | GET | `/employee` |
//! | [`ApiClient::get_schedule`] | GET | `/employee/{id}/schedule?date=` |
//! | [`ApiClient::create_appointment`] | POST | `/appointment` |
//! | [`ApiClient::book_slot`] | POST | `/schedule/book` |
//! | [`ApiClient::list_appointments`] | GET | `/appointment/` |
//! | [`ApiClient::get_appointment`] | GET | `/appointment/{id}` |
//! | [`ApiClient::submit_review`] | POST | `/review` |

pub mod appointment;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod errors;
pub mod middleware;

// Re-exportar tipos comunes para facilitar su uso
pub use client::ApiClient;
pub use errors::{AppError, AppResult, ResultExt};
