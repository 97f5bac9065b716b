use std::sync::Arc;
use wallie_core::config::Config;
use wallie_core::jira::JiraClient;

use crate::templates::{TemplateError, TemplateProvider, TemplateSource};

/// Shared application state passed to all route handlers.
///
/// Nothing in here is mutated per request except the template snapshot,
/// which only changes on reload.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jira: Arc<JiraClient>,
    pub templates: Arc<TemplateProvider>,
}

impl AppState {
    pub fn new(config: Config, jira: JiraClient, templates: TemplateProvider) -> Self {
        Self {
            config: Arc::new(config),
            jira: Arc::new(jira),
            templates: Arc::new(templates),
        }
    }

    /// State with a Jira client pointed at `config.jira_base`.
    pub fn from_config(config: Config, source: TemplateSource) -> Result<Self, TemplateError> {
        let jira = JiraClient::new(config.jira_base.clone(), config.point_scheme);
        let templates = TemplateProvider::new(source, config.always_reload_html)?;
        Ok(Self::new(config, jira, templates))
    }
}
