use std::sync::Arc;

use handlebars::Handlebars;

use super::pages;
use crate::ai::gateway::Gateway;
use crate::core::AppConfig;

/// Nothing in here changes after startup so it's shared without a
/// lock.
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: AppConfig,
    pub gateway: Gateway,
    pub templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            gateway: Gateway::new(config.gateway.clone()),
            templates: pages::templates(),
            config,
        }
    }
}
