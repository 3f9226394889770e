//! Server construction inputs resolved from settings.

use std::net::SocketAddr;

use habits_backend::outbound::persistence::DbPool;

/// Backing store the HTTP state is wired to.
#[derive(Clone, Default)]
pub enum Storage {
    /// Process-local store seeded with the default badges; lost on restart.
    #[default]
    InMemory,
    /// Diesel adapters sharing one PostgreSQL pool.
    Postgres(DbPool),
}

impl Storage {
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::InMemory => "in-memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

/// Listener address plus storage choice, handed to `create_server`.
pub struct ServerConfig {
    bind_addr: SocketAddr,
    storage: Storage,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            storage: Storage::default(),
        }
    }

    /// Persist through PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.storage = Storage::Postgres(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
