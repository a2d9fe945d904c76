/// Client assembly
///
/// `TaskdeckClient` wires configuration, durable storage, the session, the
/// HTTP transport, the query cache, and the per-domain façades into one
/// value the embedding UI holds on to. Everything is injected through the
/// constructors; there are no globals, so alternate storages, notifiers,
/// and transports drop in for tests and other embeddings.
///
/// # Example
///
/// ```no_run
/// use taskdeck_client::client::TaskdeckClient;
/// use taskdeck_client::config::ClientConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = TaskdeckClient::new(ClientConfig::from_env()?)?;
///
/// let boards = client.boards().boards(&Default::default()).await?;
/// println!("{} boards visible", boards.response.len());
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use crate::cache::{CacheConfig, QueryClient};
use crate::config::ClientConfig;
use crate::notify::{Notifier, TracingNotifier};
use crate::queries::{AuthQueries, BoardQueries, TaskQueries, UserQueries};
use crate::services::{AuthService, BoardService, TaskService, UserService};
use crate::store::backend::{FileStorage, StorageBackend};
use crate::store::prefs::UiPrefsStore;
use crate::store::session::SessionStore;
use crate::transport::{HttpTransport, Transport};

/// The assembled Taskdeck client
pub struct TaskdeckClient {
    config: ClientConfig,
    session: Arc<SessionStore>,
    prefs: Arc<UiPrefsStore>,
    cache: Arc<QueryClient>,
    auth: AuthQueries,
    boards: BoardQueries,
    tasks: TaskQueries,
    users: UserQueries,
}

impl TaskdeckClient {
    /// Builds a client with file-backed storage and the tracing notifier
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn StorageBackend> = Arc::new(FileStorage::new(&config.storage_dir));
        Self::with_parts(config, storage, Arc::new(TracingNotifier), CacheConfig::default())
    }

    /// Builds a client over the production HTTP transport with injected
    /// storage, notifier, and staleness windows
    pub fn with_parts(
        config: ClientConfig,
        storage: Arc<dyn StorageBackend>,
        notifier: Arc<dyn Notifier>,
        cache_config: CacheConfig,
    ) -> anyhow::Result<Self> {
        let session = Arc::new(SessionStore::restore(storage.clone()));
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
            config.clone(),
            session.clone(),
            notifier.clone(),
        )?);

        Ok(Self::assemble(config, storage, session, transport, notifier, cache_config))
    }

    /// Builds a client over a custom transport (for tests and embeddings
    /// that bring their own HTTP stack)
    pub fn with_transport(
        config: ClientConfig,
        storage: Arc<dyn StorageBackend>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        cache_config: CacheConfig,
    ) -> Self {
        let session = Arc::new(SessionStore::restore(storage.clone()));
        Self::assemble(config, storage, session, transport, notifier, cache_config)
    }

    fn assemble(
        config: ClientConfig,
        storage: Arc<dyn StorageBackend>,
        session: Arc<SessionStore>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        cache_config: CacheConfig,
    ) -> Self {
        let cache = Arc::new(QueryClient::new(cache_config));
        let prefs = Arc::new(UiPrefsStore::restore(storage));

        let auth = AuthQueries::new(
            AuthService::new(transport.clone()),
            cache.clone(),
            session.clone(),
            notifier.clone(),
        );
        let boards = BoardQueries::new(
            BoardService::new(transport.clone()),
            cache.clone(),
            session.clone(),
            notifier.clone(),
        );
        let tasks = TaskQueries::new(
            TaskService::new(transport.clone()),
            cache.clone(),
            session.clone(),
            notifier.clone(),
        );
        let users = UserQueries::new(
            UserService::new(transport),
            cache.clone(),
            session.clone(),
            notifier,
        );

        Self { config, session, prefs, cache, auth, boards, tasks, users }
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The authentication façade
    pub fn auth(&self) -> &AuthQueries {
        &self.auth
    }

    /// The board façade
    pub fn boards(&self) -> &BoardQueries {
        &self.boards
    }

    /// The task façade
    pub fn tasks(&self) -> &TaskQueries {
        &self.tasks
    }

    /// The user administration façade
    pub fn users(&self) -> &UserQueries {
        &self.users
    }

    /// The session store
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The UI preferences store
    pub fn prefs(&self) -> &Arc<UiPrefsStore> {
        &self.prefs
    }

    /// The query cache
    pub fn cache(&self) -> &Arc<QueryClient> {
        &self.cache
    }
}
