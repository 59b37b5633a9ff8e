//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{
    CommentRepository, ImageStore, PasswordService, PostRepository, UserRepository,
};
use inkwell_core::services::{ContentStore, CredentialStore, SessionManager, UserAdmin};
use inkwell_infra::{
    Argon2PasswordService, FsImageStore, InMemoryCache, InMemoryCommentRepository,
    InMemoryPostRepository, InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use inkwell_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub credentials: Arc<CredentialStore>,
    pub content: Arc<ContentStore>,
    pub sessions: Arc<SessionManager>,
    pub admin: Arc<UserAdmin>,
    /// Session registry; purged periodically by a background task.
    pub session_registry: Arc<InMemoryCache>,
    /// Lifetime of the `session` cookie when "remember me" is set.
    pub remember_ttl: std::time::Duration,
}

struct Stores {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn open(config: Option<&DatabaseConfig>) -> Self {
        let Some(config) = config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => Self {
                users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
                posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
                comments: Arc::new(PostgresCommentRepository::new(connections.main)),
            },
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let stores = Stores::open(config.database.as_ref()).await;

        #[cfg(not(feature = "postgres"))]
        let stores = {
            tracing::info!("Running without postgres feature - using in-memory store");
            Stores::in_memory()
        };

        let state = Self::assemble(stores, Arc::new(Argon2PasswordService::new()), config);
        tracing::info!("Application state initialized");
        state
    }

    /// State over fresh in-memory stores.
    #[cfg(test)]
    pub fn in_memory(config: &AppConfig, passwords: Arc<dyn PasswordService>) -> Self {
        Self::assemble(Stores::in_memory(), passwords, config)
    }

    fn assemble(stores: Stores, passwords: Arc<dyn PasswordService>, config: &AppConfig) -> Self {
        let images: Arc<dyn ImageStore> = Arc::new(FsImageStore::new(config.media.clone()));
        let tokens = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let session_registry = Arc::new(InMemoryCache::new());

        let credentials = Arc::new(CredentialStore::new(
            stores.users.clone(),
            passwords,
            images.clone(),
        ));
        let content = Arc::new(ContentStore::new(stores.posts, stores.comments, images));
        let sessions = Arc::new(SessionManager::new(
            credentials.clone(),
            stores.users.clone(),
            tokens,
            session_registry.clone(),
            config.session.clone(),
        ));
        let admin = Arc::new(UserAdmin::new(stores.users.clone(), credentials.clone()));

        Self {
            users: stores.users,
            credentials,
            content,
            sessions,
            admin,
            session_registry,
            remember_ttl: config.session.remember_ttl,
        }
    }
}
