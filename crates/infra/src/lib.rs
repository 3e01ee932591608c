mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::*;
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, SimulatedSys};

#[derive(Clone)]
pub struct PortalContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub activity: ActivityBus,
}

impl PortalContext {
    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = Repos::create_local(&config).await?;
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            activity: ActivityBus::new(),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            activity: ActivityBus::new(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<PortalContext> {
    PortalContext::create(Config::new()).await
}
