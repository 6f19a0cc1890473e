//! Servidor de pruebas con actix-web que graba cada petición y responde con
//! cuerpos fijos por (método, ruta).
#![allow(dead_code)]

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

pub struct MockState {
    routes: HashMap<(String, String), (u16, Value)>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockState {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().last().cloned().expect("no requests recorded")
    }
}

async fn handle(req: HttpRequest, body: web::Bytes, state: web::Data<MockState>) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    let recorded = Recorded {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        authorization: header("authorization"),
        request_id: header("x-request-id"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    let key = (recorded.method.clone(), recorded.path.clone());
    state.requests.lock().unwrap().push(recorded);

    match state.routes.get(&key) {
        Some((status, body)) => {
            HttpResponse::build(StatusCode::from_u16(*status).unwrap()).json(body)
        }
        None => HttpResponse::NotFound().finish(),
    }
}

/// Arranca el servidor en un puerto libre y devuelve su URL base
pub fn start(routes: &[(&str, &str, u16, Value)]) -> (String, web::Data<MockState>) {
    let state = web::Data::new(MockState {
        routes: routes
            .iter()
            .map(|(method, path, status, body)| {
                ((method.to_string(), path.to_string()), (*status, body.clone()))
            })
            .collect(),
        requests: Mutex::new(Vec::new()),
    });

    let data = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .default_service(web::to(handle))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    (format!("http://{}", addr), state)
}
