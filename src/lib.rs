//! # MelNiz Client
//!
//! Cliente de la API REST del spa MelNiz: sesión local, operaciones remotas,
//! flujo de reserva de citas y cálculos del perfil (gasto, descuento de
//! fidelidad, reseñas).
//!
//! ## Arquitectura
//!
//! ```text
//! CLI / pantallas
//!     ↓ BookingFlow, ProfileSummary, ReviewBoard
//! ApiClient (reqwest) ── SessionContext ── FileSessionStore
//!     ↓ HTTP/JSON + Bearer
//! Servidor del salón
//! ```
//!
//! Toda la lógica de negocio (conflictos de horario, precios, persistencia)
//! vive en el servidor; este crate solo llama a los endpoints y calcula lo
//! que la aplicación muestra.

pub mod api;
pub mod booking;
pub mod config;
pub mod db;
pub mod local_time;
pub mod navigation;
pub mod notice;
pub mod profile;

pub use api::{ApiClient, AppError, AppResult};
pub use booking::{BookingFlow, ScheduleQuery, ScheduleTicket};
pub use config::Config;
pub use db::{SessionContext, SessionStore};
pub use notice::Notice;
pub use profile::{ProfileSummary, ReviewBoard, SpendPolicy};
