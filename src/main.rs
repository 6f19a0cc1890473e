//! # MelNiz CLI
//!
//! Interfaz de línea de comandos del cliente del spa: cada subcomando hace de
//! pantalla de la aplicación y muestra los mismos avisos.
//!
//! ## Configuración
//!
//! ```env
//! MELNIZ_API_URL=http://192.168.0.48:5173
//! MELNIZ_SESSION_FILE=./session.json
//! MELNIZ_SPEND_POLICY=all
//! RUST_LOG=melniz_client=debug
//! ```
//!
//! ## Ejecución
//!
//! ```bash
//! melniz login --email anna@example.com --password secreto
//! melniz procedures
//! melniz schedule --employee 3 --date 2024-06-01
//! melniz book --procedure 5 --employee 3 --date 2024-06-01 --slot 12
//! melniz profile
//! melniz review --appointment 10 --rating 5 --comment "Отлично"
//! ```

use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use melniz_client::api::catalog::SCHEDULE_DATE_FORMAT;
use melniz_client::db::Registration;
use melniz_client::local_time::{format_date, format_time, parse_timestamp};
use melniz_client::api::middleware::ErrorLogExt;
use melniz_client::navigation::{self, AuthRequest, Route};
use melniz_client::{
    ApiClient, AppError, AppResult, BookingFlow, Config, Notice, ProfileSummary, ReviewBoard,
    SessionContext,
};

#[derive(Parser)]
#[command(name = "melniz", version, about = "Cliente del spa MelNiz")]
struct Cli {
    /// Dirección base de la API
    #[arg(long, env = "MELNIZ_API_URL", global = true)]
    api_url: Option<String>,

    /// Fichero donde se guarda la sesión
    #[arg(long, env = "MELNIZ_SESSION_FILE", global = true)]
    session_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Iniciar sesión
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Crear una cuenta
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Cerrar sesión
    Logout,
    /// Mostrar la pantalla inicial según la sesión guardada
    Status,
    /// Listar procedimientos
    Procedures,
    /// Listar empleados
    Employees,
    /// Horario de un empleado
    Schedule {
        #[arg(long)]
        employee: i64,
        /// Fecha YYYY-MM-DD (por defecto hoy)
        #[arg(long)]
        date: Option<String>,
    },
    /// Reservar una cita
    Book {
        #[arg(long)]
        procedure: i64,
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        date: Option<String>,
        /// Id de la franja del horario
        #[arg(long)]
        slot: i64,
    },
    /// Listar citas, o mostrar una con --id
    Appointments {
        #[arg(long)]
        id: Option<i64>,
    },
    /// Perfil, gasto total y descuento
    Profile,
    /// Dejar una reseña sobre una cita pasada
    Review {
        #[arg(long)]
        appointment: i64,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("melniz_client=info,melniz=info")
                }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(Some(notice)) => {
            println!("{}", notice);
            if notice.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Comando fallido");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_date(raw: Option<&str>) -> AppResult<NaiveDate> {
    match raw {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, SCHEDULE_DATE_FORMAT).map_err(|_| {
            AppError::Validation("Formato de fecha inválido, use YYYY-MM-DD".to_string())
        }),
    }
}

/// Ejecuta el subcomando. Devuelve el aviso a mostrar, si lo hay.
async fn run(cli: Cli) -> AppResult<Option<Notice>> {
    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path.into();
    }

    let session = SessionContext::file(config.session_file.clone());
    let api = ApiClient::new(&config.api_url, session.clone())?;
    tracing::debug!(api_url = %api.base_url(), "Cliente configurado");

    match cli.command {
        Command::Login { email, password } => {
            let request = AuthRequest::Login { email, password };
            authenticate(&api, &request).await
        }
        Command::Register {
            name,
            phone,
            email,
            password,
        } => {
            let request = AuthRequest::Register(Registration {
                name,
                phone,
                email,
                password,
            });
            authenticate(&api, &request).await
        }
        Command::Logout => {
            let route = navigation::sign_out(&api).await?;
            println!("→ {}", route);
            Ok(None)
        }
        Command::Status => {
            let route = navigation::initial_route(&session).await?;
            println!("→ {}", route);
            if let Some(user_id) = session.user_id().await? {
                println!("userId: {}", user_id);
            }
            Ok(None)
        }
        Command::Procedures => {
            let Ok(procedures) = api
                .list_procedures()
                .await
                .log_error_warn("loading procedures")
            else {
                return Ok(Some(Notice::DataLoadFailed));
            };
            for p in procedures {
                println!("[{}] {} — {} ₽", p.id, p.name, p.price);
                if !p.description.is_empty() {
                    println!("    {}", p.description);
                }
            }
            Ok(None)
        }
        Command::Employees => {
            let Ok(employees) = api
                .list_employees()
                .await
                .log_error_warn("loading employees")
            else {
                return Ok(Some(Notice::DataLoadFailed));
            };
            for e in employees {
                println!("[{}] {} {}", e.id, e.name, e.phone.unwrap_or_default());
            }
            Ok(None)
        }
        Command::Schedule { employee, date } => {
            let date = parse_date(date.as_deref())?;
            let Ok(slots) = api
                .get_schedule(employee, date)
                .await
                .log_error_warn("loading schedule")
            else {
                return Ok(Some(Notice::DataLoadFailed));
            };
            for slot in slots {
                let time = parse_timestamp(&slot.start_time)
                    .map(format_time)
                    .unwrap_or_else(|| slot.start_time.clone());
                let state = if slot.is_booked { "занято" } else { "свободно" };
                println!("[{}] {} {}", slot.id, time, state);
            }
            Ok(None)
        }
        Command::Book {
            procedure,
            employee,
            date,
            slot,
        } => {
            let date = parse_date(date.as_deref())?;
            let route = navigation::open_booking(&session).await?;
            if route != Route::Appointment {
                println!("→ {}", route);
                return Ok(Some(Notice::UserNotFound));
            }

            let Ok(procedures) = api
                .list_procedures()
                .await
                .log_error_warn("loading procedures")
            else {
                return Ok(Some(Notice::DataLoadFailed));
            };
            let procedure = procedures
                .into_iter()
                .find(|p| p.id == procedure)
                .ok_or_else(|| {
                    AppError::validation_field("procedure", "procedimiento no encontrado")
                })?;

            println!("{} — {} ₽", procedure.name, procedure.price);

            let mut flow = BookingFlow::new(procedure, date);
            if flow.load_employees(&api).await.is_err() {
                return Ok(Some(Notice::DataLoadFailed));
            }
            if let Some(ticket) = flow.select_employee(employee) {
                let Ok(slots) = BookingFlow::fetch_schedule(&api, &ticket).await else {
                    return Ok(Some(Notice::DataLoadFailed));
                };
                flow.apply_schedule(&ticket, slots);
            }

            // Una franja reservada no se puede elegir: la validación lo avisa
            flow.select_slot(slot);
            Ok(Some(flow.confirm(&api).await))
        }
        Command::Appointments { id } => {
            let loaded = match id {
                Some(id) => api.get_appointment(id).await.map(|a| vec![a]),
                None => api.list_appointments().await,
            };
            let Ok(appointments) = loaded.log_error_warn("loading appointments") else {
                return Ok(Some(Notice::DataLoadFailed));
            };
            for a in appointments {
                println!(
                    "[{}] {} {} — {} ({})",
                    a.id,
                    format_date(a.date),
                    format_time(a.date),
                    a.procedure.name,
                    a.employee.name
                );
            }
            Ok(None)
        }
        Command::Profile => {
            let Ok(profile) = api.get_profile().await else {
                return Ok(Some(Notice::ProfileLoadFailed));
            };
            let summary = ProfileSummary::build(&profile, Utc::now(), config.spend_policy);

            println!("{}", profile.name);
            println!("Общая сумма заказов: {} ₽", summary.total_spend);
            if summary.discount > 0 {
                println!("Ваша скидка: {}%", summary.discount);
            }
            println!();
            println!("Записи");
            for card in &summary.cards {
                println!("Услуга: {}", card.appointment.procedure.name);
                println!("Стоимость: {} ₽", card.appointment.procedure.price);
                println!("Дата приёма: {} {}", card.date, card.time);
                println!("Мастер: {}", card.appointment.employee.name);
                if card.completed {
                    println!(
                        "Выполнено · можно оставить отзыв (id {})",
                        card.appointment.id
                    );
                }
                println!();
            }
            Ok(None)
        }
        Command::Review {
            appointment,
            rating,
            comment,
        } => {
            let Ok(profile) = api.get_profile().await else {
                return Ok(Some(Notice::ProfileLoadFailed));
            };
            let appointment = profile
                .appointments
                .iter()
                .find(|a| a.id == appointment)
                .ok_or_else(|| AppError::validation_field("appointment", "cita no encontrada"))?;

            let mut board = ReviewBoard::new();
            board.toggle_form(appointment.id);
            board.set_rating(rating);
            board.set_comment(comment);
            Ok(Some(board.submit(&api, profile.id, appointment, Utc::now()).await))
        }
    }
}

async fn authenticate(api: &ApiClient, request: &AuthRequest) -> AppResult<Option<Notice>> {
    match navigation::authenticate(api, request).await {
        Ok(route) => {
            println!("→ {}", route);
            Ok(None)
        }
        Err(notice) => Ok(Some(notice)),
    }
}
