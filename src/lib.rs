mod domain;
mod infrastructure;
mod interfaces;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::media;
pub use interfaces::{clients, handlers, routes};

use clients::backend::HttpAdBackend;
use clients::level::LevelLookupClient;
use use_cases::submit::SubmitHandler;

pub struct AppState {
    pub submit_handler: AppSubmitHandler,
}

pub type AppSubmitHandler = SubmitHandler<LevelLookupClient, HttpAdBackend>;

impl AppState {
    pub fn new(config: &settings::AppConfig) -> anyhow::Result<Self> {
        let level_directory = LevelLookupClient::new(
            config.level_lookup_url.clone(),
            config.upstream_timeout_secs,
        )?;
        let backend = HttpAdBackend::new(
            config.backend_base_url.clone(),
            config.upstream_timeout_secs,
        )?;

        Ok(AppState {
            submit_handler: SubmitHandler::new(level_directory, backend),
        })
    }
}
