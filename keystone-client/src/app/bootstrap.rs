use std::sync::Arc;

use crate::domains::auth::{SessionController, SessionService, TokenStore};
use crate::domains::dashboard::DashboardService;
use crate::domains::navigation::{
    ChannelNavigator, GuardDecision, Route, guard,
};
use crate::infra::api_client::ApiClient;
use crate::infra::config::Config;
use crate::infra::errors::ApiResult;
use crate::infra::storage::{FileStore, KeyValueStore};

/// Everything a front-end needs, built once at startup
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub api: ApiClient,
    pub session: Arc<SessionController>,
    pub navigator: ChannelNavigator,
    pub dashboard: DashboardService,
}

impl AppContext {
    /// Open the configured file store, wire the services and hydrate the
    /// session before returning.
    pub async fn bootstrap(config: Config) -> ApiResult<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(FileStore::open_default()?),
        };
        Self::with_store(config, store).await
    }

    /// Same as [`AppContext::bootstrap`] with a caller-provided store
    pub async fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
    ) -> ApiResult<Self> {
        let tokens = TokenStore::new(Arc::clone(&store));
        let api = ApiClient::from_config(&config, tokens)?;
        let navigator = ChannelNavigator::new(Route::Dashboard);

        let service = Arc::new(SessionService::new(api.clone()));
        let session =
            SessionController::start(service, Arc::new(navigator.clone()))
                .await;

        log::info!(
            "[AppContext] Started against {} (signed in: {})",
            api.base_url(),
            session.is_verified()
        );

        Ok(Self {
            config,
            store,
            api,
            session,
            navigator,
            dashboard: DashboardService::default(),
        })
    }

    /// Route the UI should show for `path` given the current session
    pub fn resolve(&self, path: &str) -> Route {
        let requested = Route::from_path(path);
        match guard(&requested, &self.session.state()) {
            GuardDecision::Redirect(to) => to,
            _ => requested,
        }
    }
}
