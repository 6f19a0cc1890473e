//! # API de catálogo
//!
//! Datos de referencia de solo lectura: procedimientos, empleados y el
//! horario de cada empleado.

use chrono::NaiveDate;

use super::{ApiClient, AppResult};
use crate::db::{Employee, Procedure, ScheduleSlot};

/// Formato ISO de fecha, sin hora, usado en el parámetro `date`
pub const SCHEDULE_DATE_FORMAT: &str = "%Y-%m-%d";

impl ApiClient {
    /// `GET /procedures`
    pub async fn list_procedures(&self) -> AppResult<Vec<Procedure>> {
        self.get("list_procedures", "/procedures").await
    }

    /// `GET /employee`
    pub async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.get("list_employees", "/employee").await
    }

    /// Horario de un empleado para una fecha
    ///
    /// `GET /employee/{employee_id}/schedule?date=YYYY-MM-DD`
    ///
    /// # Respuesta
    /// ```json
    /// [
    ///   { "id": 1, "employeeId": 3, "startTime": "2024-06-01T10:00:00.000Z", "isBooked": false }
    /// ]
    /// ```
    pub async fn get_schedule(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<ScheduleSlot>> {
        let path = format!("/employee/{}/schedule", employee_id);
        let query = [("date", date.format(SCHEDULE_DATE_FORMAT).to_string())];
        self.get_with_query("get_schedule", &path, &query).await
    }
}
