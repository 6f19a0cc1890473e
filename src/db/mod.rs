// src/db/mod.rs
pub mod models;
pub mod session;

pub use models::{
    Appointment, AuthResponse, AuthUser, BookSlot, Credentials, Employee, EmployeeSummary,
    NewAppointment, NewReview, Procedure, ProcedureSummary, Profile, Rating, Registration,
    ScheduleSlot, Session,
};
pub use session::{FileSessionStore, MemorySessionStore, SessionContext, SessionStore};
