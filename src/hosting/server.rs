use super::*;
use crate::Config;
use crate::leaderboard::Disk;
use crate::leaderboard::Ledger;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub struct Server;

impl Server {
    pub async fn run(config: Config) -> Result<(), std::io::Error> {
        let ledger = Ledger::spawn(Disk::new(&config.store));
        ledger.verify().await;
        let casino = Arc::new(Casino::new(ledger, config.timer()));
        let state = web::Data::from(casino);
        log::info!("starting hosting server on {}", config.bind);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(state.clone())
                .route("/ws", web::get().to(enter))
                .route("/nickname", web::post().to(nickname))
                .route("/leaderboard", web::get().to(leaderboard))
                .route("/health", web::get().to(health))
        })
        .workers(config.workers)
        .bind(&config.bind)?
        .run()
        .await
    }
}

#[derive(Debug, Default, Deserialize)]
struct NicknameRequest {
    #[serde(default, rename = "userId")]
    user_id: Value,
    #[serde(default)]
    nickname: Value,
}

/// Whether a request field counts as supplied: null, false, zero and the
/// empty string do not.
fn supplied(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

async fn nickname(casino: web::Data<Casino>, body: web::Bytes) -> impl Responder {
    let request = serde_json::from_slice::<NicknameRequest>(&body).unwrap_or_default();
    let user_id = Some(&request.user_id)
        .filter(|v| supplied(v))
        .and_then(Protocol::identity);
    let (Some(user_id), true) = (user_id, supplied(&request.nickname)) else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "ok": false, "error": "userId and nickname required" }));
    };
    let nickname = Protocol::text(&request.nickname);
    match casino.nickname(&user_id, nickname.as_deref()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => {
            log::error!("failed to update nickname for {}: {:#}", user_id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "ok": false, "error": "Failed to update nickname" }))
        }
    }
}

async fn leaderboard(casino: web::Data<Casino>) -> impl Responder {
    match casino.leaderboard().await {
        Ok(standings) => HttpResponse::Ok().json(standings),
        Err(e) => {
            log::error!("failed to load leaderboard: {:#}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Failed to load leaderboard" }))
        }
    }
}

async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

async fn enter(casino: web::Data<Casino>, body: web::Payload, req: HttpRequest) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => match casino.into_inner().bridge(session, stream).await {
            Ok(()) => response.map_into_left_body(),
            Err(e) => HttpResponse::InternalServerError()
                .body(e.to_string())
                .map_into_right_body(),
        },
        Err(e) => HttpResponse::BadRequest()
            .body(e.to_string())
            .map_into_right_body(),
    }
}
