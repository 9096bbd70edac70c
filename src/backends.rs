//! Backend adapter registry.
//!
//! Each backend contributes a [`BackendFactory`] that turns the plan's model
//! definitions into a [`BackendSession`]: the introspectors plus the
//! connection behind them, closed once generation ends. Database backends
//! are only registered when their cargo feature is enabled.

use crate::logging::mask_connection_password;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use fill_core::ModelDefinition;
use fill_populate::{BackendKind, MemoryStore, ModelIntrospector};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Where a populate run writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulateTarget {
    Memory,
    PostgreSQL { connection_string: String },
    MySQL { connection_string: String },
}

impl PopulateTarget {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Memory => BackendKind::Memory,
            Self::PostgreSQL { .. } => BackendKind::PostgreSQL,
            Self::MySQL { .. } => BackendKind::MySQL,
        }
    }

    pub fn connection_string(&self) -> Option<&str> {
        match self {
            Self::Memory => None,
            Self::PostgreSQL { connection_string } | Self::MySQL { connection_string } => {
                Some(connection_string)
            }
        }
    }
}

/// Connection shared by a session's introspectors.
#[async_trait]
pub trait BackendConnection: Send {
    /// Release the connection. Called after every introspector is dropped.
    async fn close(self: Box<Self>) -> anyhow::Result<()>;
}

/// Introspectors for one run and the connection they use, if the backend
/// holds one open.
pub struct BackendSession {
    /// One introspector per definition, in the same order.
    pub adapters: Vec<Arc<dyn ModelIntrospector>>,
    pub connection: Option<Box<dyn BackendConnection>>,
}

impl BackendSession {
    pub fn new(adapters: Vec<Arc<dyn ModelIntrospector>>) -> Self {
        Self {
            adapters,
            connection: None,
        }
    }

    pub fn with_connection(mut self, connection: Box<dyn BackendConnection>) -> Self {
        self.connection = Some(connection);
        self
    }
}

/// Opens sessions on one backend.
#[async_trait]
pub trait BackendFactory: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn open(
        &self,
        target: &PopulateTarget,
        seed: u64,
        definitions: Vec<ModelDefinition>,
    ) -> anyhow::Result<BackendSession>;
}

fn connection_string(target: &PopulateTarget) -> anyhow::Result<&str> {
    target
        .connection_string()
        .ok_or_else(|| anyhow!("{} target has no connection string", target.kind()))
}

/// In-memory backend.
///
/// Without an explicit store a fresh one is created per run, seeded with the
/// run's seed.
#[derive(Default)]
pub struct MemoryBackend {
    store: Option<MemoryStore>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write into `store` so the caller can inspect it afterwards.
    pub fn with_store(store: MemoryStore) -> Self {
        Self { store: Some(store) }
    }
}

#[async_trait]
impl BackendFactory for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn open(
        &self,
        _target: &PopulateTarget,
        seed: u64,
        definitions: Vec<ModelDefinition>,
    ) -> anyhow::Result<BackendSession> {
        let store = self
            .store
            .clone()
            .unwrap_or_else(|| MemoryStore::new(seed));
        Ok(BackendSession::new(
            definitions
                .into_iter()
                .map(|d| Arc::new(store.model(d)) as Arc<dyn ModelIntrospector>)
                .collect(),
        ))
    }
}

#[cfg(feature = "postgresql")]
pub struct PostgreSQLBackend;

#[cfg(feature = "postgresql")]
#[async_trait]
impl BackendFactory for PostgreSQLBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PostgreSQL
    }

    async fn open(
        &self,
        target: &PopulateTarget,
        _seed: u64,
        definitions: Vec<ModelDefinition>,
    ) -> anyhow::Result<BackendSession> {
        let conn_str = connection_string(target)?;
        info!("Connecting to PostgreSQL at {}", mask_connection_password(conn_str));
        let database = fill_populate_postgresql::PostgreSQLDatabase::connect(conn_str)
            .await
            .context("Failed to connect to PostgreSQL")?;
        Ok(BackendSession::new(
            definitions
                .into_iter()
                .map(|d| Arc::new(database.model(d)) as Arc<dyn ModelIntrospector>)
                .collect(),
        ))
    }
}

#[cfg(feature = "mysql")]
pub struct MySQLBackend;

#[cfg(feature = "mysql")]
#[async_trait]
impl BackendFactory for MySQLBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MySQL
    }

    async fn open(
        &self,
        target: &PopulateTarget,
        _seed: u64,
        definitions: Vec<ModelDefinition>,
    ) -> anyhow::Result<BackendSession> {
        let conn_str = connection_string(target)?;
        info!("Connecting to MySQL at {}", mask_connection_password(conn_str));
        let database = fill_populate_mysql::MySQLDatabase::connect(conn_str)
            .await
            .context("Failed to connect to MySQL")?;
        let adapters = database
            .models(definitions)
            .into_iter()
            .map(|m| Arc::new(m) as Arc<dyn ModelIntrospector>)
            .collect();
        Ok(BackendSession::new(adapters).with_connection(Box::new(database)))
    }
}

#[cfg(feature = "mysql")]
#[async_trait]
impl BackendConnection for fill_populate_mysql::MySQLDatabase {
    async fn close(self: Box<Self>) -> anyhow::Result<()> {
        let database = *self;
        database
            .disconnect()
            .await
            .context("Failed to disconnect from MySQL")?;
        info!("Disconnected from MySQL");
        Ok(())
    }
}

/// Backend factories by kind.
pub struct AdapterRegistry {
    factories: HashMap<BackendKind, Box<dyn BackendFactory>>,
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Every backend compiled into this build.
    pub fn with_available_backends() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(MemoryBackend::new()));
        #[cfg(feature = "postgresql")]
        registry.register(Box::new(PostgreSQLBackend));
        #[cfg(feature = "mysql")]
        registry.register(Box::new(MySQLBackend));
        registry
    }

    /// Add or replace the factory for its backend kind.
    pub fn register(&mut self, factory: Box<dyn BackendFactory>) -> Option<Box<dyn BackendFactory>> {
        self.factories.insert(factory.kind(), factory)
    }

    pub fn get(&self, kind: BackendKind) -> anyhow::Result<&dyn BackendFactory> {
        self.factories
            .get(&kind)
            .map(|f| f.as_ref())
            .ok_or_else(|| anyhow!("Backend '{kind}' is not available in this build"))
    }

    /// Available backend kinds, sorted.
    pub fn kinds(&self) -> Vec<BackendKind> {
        let mut kinds: Vec<BackendKind> = self.factories.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_available_backends()
    }
}
