//! Decides between a canned greeting and a provider call, then sanitizes the reply.

pub mod filter;
pub mod greeting;

use std::sync::Arc;

use log::{error, info};

use crate::model::GenerationProvider;
use crate::web::models::Turn;

pub const BRAND: &str = "ShaktiMaangPT";

pub const FALLBACK_MESSAGE: &str =
    "We are currently training the system to serve you better. Please try again later.";

#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Greeting(String),
    Generated(String),
    /// The provider failed; the caller sees only [`FALLBACK_MESSAGE`].
    Fallback,
}

impl Reply {
    pub fn content(&self) -> &str {
        match self {
            Reply::Greeting(text) | Reply::Generated(text) => text,
            Reply::Fallback => FALLBACK_MESSAGE,
        }
    }
}

#[derive(Clone)]
pub struct ChatRelay {
    provider: Arc<dyn GenerationProvider>,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// `hour` is the local wall-clock hour (0-23).
    pub async fn respond(&self, message: &str, history: &[Turn], hour: u32) -> Reply {
        if greeting::is_greeting(message) {
            info!("Greeting detected, answering without provider");
            return Reply::Greeting(format!("{}: {}", BRAND, greeting::time_based_greeting(hour)));
        }

        match self.provider.generate(message, history).await {
            Ok(text) => Reply::Generated(filter::filter_restricted_terms(&text)),
            Err(e) => {
                error!("Error processing request: {}", e);
                Reply::Fallback
            }
        }
    }
}
