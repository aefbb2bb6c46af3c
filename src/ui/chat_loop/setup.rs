use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::AppHandle;

use crate::core::{
    app::{App, AppInitConfig},
    config::Config,
    gemini::GeminiBackend,
    persona::PersonaCatalog,
};

/// Startup choices taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub persona: Option<String>,
    pub log: Option<String>,
}

/// Everything resolved from flags, the config file and the environment
/// before a session can be opened.
pub struct Startup {
    pub config: Config,
    pub catalog: PersonaCatalog,
    pub backend: GeminiBackend,
    pub persona: Option<String>,
}

/// Persona id to start with: the flag wins over the config file. `None`
/// means the first catalog entry.
pub fn pick_persona(flag: Option<String>, config: &Config) -> Option<String> {
    flag.or_else(|| config.default_persona.clone())
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

/// Model name: the flag wins over the config file, which wins over the
/// built-in default.
pub fn pick_model(flag: Option<String>, config: &Config) -> String {
    flag.map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| config.model().to_string())
}

pub fn resolve_startup(
    model: Option<String>,
    persona: Option<String>,
) -> Result<Startup, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = PersonaCatalog::with_extra(&config.personas)?;
    let persona = pick_persona(persona, &config);
    if let Some(id) = persona.as_deref() {
        catalog.resolve_index(id)?;
    }
    let backend = GeminiBackend::from_env(pick_model(model, &config), config.base_url());

    Ok(Startup {
        config,
        catalog,
        backend,
        persona,
    })
}

/// Build the application state for the chat loop.
pub fn bootstrap_app(options: ChatOptions) -> Result<AppHandle, Box<dyn std::error::Error>> {
    let ChatOptions {
        model,
        persona,
        log,
    } = options;
    let Startup {
        config,
        catalog,
        backend,
        persona,
    } = resolve_startup(model, persona)?;

    info!(
        model = backend.model(),
        personas = catalog.len(),
        has_api_key = backend.has_api_key(),
        "bootstrapping chat"
    );

    let app = App::new(AppInitConfig {
        catalog,
        model: backend.model().to_string(),
        backend: Arc::new(backend),
        persona,
        log_file: log,
        sidebar_breakpoint: config.sidebar_breakpoint(),
    })?;
    info!(transcript = %app.session.logging.get_status_string(), "transcript log");

    Ok(AppHandle::new(Arc::new(Mutex::new(app))))
}
