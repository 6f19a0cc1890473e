//! # API de citas
//!
//! - Crear una cita
//! - Reservar una franja del horario
//! - Listar citas y obtener una cita por id
//! - Enviar una reseña sobre un procedimiento
//!
//! Todas las rutas esperan el token Bearer que añade el cliente.

use serde_json::Value;

use super::{ApiClient, AppResult};
use crate::db::{Appointment, BookSlot, NewAppointment, NewReview};

impl ApiClient {
    /// Crea una cita
    ///
    /// `POST /appointment` con `{ userId, procedureId, employeeId, date }`.
    /// La fecha ya debe venir desplazada y formateada; ver
    /// [`crate::booking::BookingFlow::prepare`].
    pub async fn create_appointment(&self, appointment: &NewAppointment) -> AppResult<Value> {
        self.post("create_appointment", "/appointment", appointment).await
    }

    /// `POST /schedule/book` con `{ scheduleId }`
    pub async fn book_slot(&self, schedule_id: i64) -> AppResult<Value> {
        self.post("book_slot", "/schedule/book", &BookSlot { schedule_id }).await
    }

    /// `GET /appointment/`
    pub async fn list_appointments(&self) -> AppResult<Vec<Appointment>> {
        self.get("list_appointments", "/appointment/").await
    }

    /// `GET /appointment/{id}`
    pub async fn get_appointment(&self, id: i64) -> AppResult<Appointment> {
        self.get("get_appointment", &format!("/appointment/{}", id)).await
    }

    /// Envía una reseña
    ///
    /// `POST /review` con `{ userId, procedureId, rating, comment }`.
    ///
    /// # Errores
    /// - `409 Conflict`: ya existe una reseña de este usuario para el procedimiento
    pub async fn submit_review(&self, review: &NewReview) -> AppResult<Value> {
        self.post("submit_review", "/review", review).await
    }
}
