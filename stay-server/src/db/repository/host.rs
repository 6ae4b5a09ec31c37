//! Host Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Host, HostNew};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "host";

#[derive(Clone)]
pub struct HostRepository {
    base: BaseRepository,
}

impl HostRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find host by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Host>> {
        let rid = parse_record_id(TABLE, id);
        let host: Option<Host> = self.base.db().select(rid).await?;
        Ok(host)
    }

    /// Find the host profile owned by a user
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Option<Host>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM host WHERE user = $user LIMIT 1")
            .bind(("user", user.clone()))
            .await?;
        let hosts: Vec<Host> = result.take(0)?;
        Ok(hosts.into_iter().next())
    }

    /// Create a host profile for a user
    pub async fn create(&self, user: RecordId) -> RepoResult<Host> {
        let created: Option<Host> = self
            .base
            .db()
            .create(TABLE)
            .content(HostNew { user })
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create host".to_string()))
    }
}
