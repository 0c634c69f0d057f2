//! Ticket stores with injected failures

use async_trait::async_trait;
use gala_common::db::init_memory_database;
use gala_common::{Error, Result};
use gala_tickets::db::{SqliteTicketStore, TicketRecord, TicketStore};
use gala_tickets::services::TicketCode;

/// Store whose batch write always fails; everything else works
pub struct FailingInsertStore {
    inner: SqliteTicketStore,
}

impl FailingInsertStore {
    pub async fn new() -> Self {
        Self {
            inner: SqliteTicketStore::new(init_memory_database().await.unwrap()),
        }
    }

    pub fn inner(&self) -> &SqliteTicketStore {
        &self.inner
    }
}

#[async_trait]
impl TicketStore for FailingInsertStore {
    async fn clear(&self) -> Result<u64> {
        self.inner.clear().await
    }

    async fn batch_insert(&self, _codes: &[TicketCode]) -> Result<Vec<TicketRecord>> {
        Err(Error::Unavailable("batch write rejected".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<TicketRecord>> {
        self.inner.list_all().await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<TicketRecord>> {
        self.inner.find_by_code(code).await
    }
}

/// Store whose delete always fails
pub struct FailingClearStore {
    inner: SqliteTicketStore,
}

impl FailingClearStore {
    pub async fn new() -> Self {
        Self {
            inner: SqliteTicketStore::new(init_memory_database().await.unwrap()),
        }
    }

    pub fn inner(&self) -> &SqliteTicketStore {
        &self.inner
    }
}

#[async_trait]
impl TicketStore for FailingClearStore {
    async fn clear(&self) -> Result<u64> {
        Err(Error::Unavailable("delete rejected".to_string()))
    }

    async fn batch_insert(&self, codes: &[TicketCode]) -> Result<Vec<TicketRecord>> {
        self.inner.batch_insert(codes).await
    }

    async fn list_all(&self) -> Result<Vec<TicketRecord>> {
        self.inner.list_all().await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<TicketRecord>> {
        self.inner.find_by_code(code).await
    }
}
