mod config;
mod model;
mod relay;
mod store;
mod web;

use std::sync::Arc;

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};

use config::{AppConfig, ProviderKind};
use model::direct::DirectModel;
use model::{GeminiModel, GenerationProvider};
use relay::ChatRelay;
use store::DocumentStore;
use web::routes;

// App state structure
pub struct AppState {
    pub relay: ChatRelay,
    pub document_store: Option<DocumentStore>,
}

fn build_provider(config: &AppConfig) -> Arc<dyn GenerationProvider> {
    match config.provider {
        ProviderKind::Gemini => {
            if config.gemini.api_key.is_none() {
                warn!("GOOGLE_API_KEY is not set; non-greeting messages will get the fallback reply");
            }
            Arc::new(GeminiModel::new(&config.gemini))
        }
        ProviderKind::Direct => {
            if config.direct.api_key.is_none() {
                warn!("GEMINI_API_KEY is not set; non-greeting messages will get the fallback reply");
            }
            Arc::new(DirectModel::new(&config.direct))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting ShaktiMaangPT chat relay");

    let config = AppConfig::from_env();
    let relay = ChatRelay::new(build_provider(&config));

    let document_store = match &config.document_store {
        Some(store_config) => match DocumentStore::connect(store_config).await {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("Continuing without document store: {:#}", e);
                None
            }
        },
        None => None,
    };

    let app_state = Data::new(AppState {
        relay,
        document_store,
    });

    info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn provider_follows_configuration() {
        assert_eq!(build_provider(&config_with(&[])).name(), "gemini");
        assert_eq!(
            build_provider(&config_with(&[("RELAY_PROVIDER", "direct")])).name(),
            "direct"
        );
    }
}
