use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use chrono::{Local, Timelike};
use log::{debug, error, info};
use serde_json::json;

use crate::relay::{Reply, FALLBACK_MESSAGE};
use crate::web::models::{ChatRequest, ChatResponse};
use crate::AppState;

// Health check endpoint
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "provider": data.relay.provider_name(),
        "document_store": data.document_store.as_ref().map(|store| store.database().name()),
    }))
}

// Chat API endpoint
pub async fn chat(data: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    let ChatRequest { message, history } = req.into_inner();
    info!("Chat request with {} prior turns", history.len());
    debug!("Message: {}", message);

    let hour = Local::now().hour();
    let reply = data.relay.respond(&message, &history, hour).await;

    let status = match reply {
        Reply::Fallback => StatusCode::INTERNAL_SERVER_ERROR,
        Reply::Greeting(_) | Reply::Generated(_) => StatusCode::OK,
    };
    HttpResponse::build(status).json(ChatResponse::assistant(reply.content()))
}

/// Unreadable request bodies get the same fallback envelope as provider failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        error!("Error processing request: {}", err);
        let response =
            HttpResponse::InternalServerError().json(ChatResponse::assistant(FALLBACK_MESSAGE));
        InternalError::from_response(err, response).into()
    })
}
