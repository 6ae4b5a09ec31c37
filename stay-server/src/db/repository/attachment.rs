//! Attachment Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Attachment, AttachmentNew};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "attachment";

#[derive(Clone)]
pub struct AttachmentRepository {
    base: BaseRepository,
}

impl AttachmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find attachment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Attachment>> {
        let rid = parse_record_id(TABLE, id);
        let attachment: Option<Attachment> = self.base.db().select(rid).await?;
        Ok(attachment)
    }

    /// Insert attachment metadata, returning the new id
    pub async fn insert(&self, data: AttachmentNew) -> RepoResult<RecordId> {
        let created: Option<Attachment> = self.base.db().create(TABLE).content(data).await?;
        created
            .and_then(|a| a.id)
            .ok_or_else(|| RepoError::Database("Failed to insert attachment".to_string()))
    }

    /// Stored blob keys for a set of attachment ids
    ///
    /// 删除附件前先取回对象键，以便事务提交后清理 blob。
    pub async fn find_file_names(&self, ids: &[RecordId]) -> RepoResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let names: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE fileName FROM attachment WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(names)
    }
}
