//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod attachment;
pub mod booking;
pub mod chat;
pub mod homestay;
pub mod host;
pub mod menu_item;
pub mod user;

// Re-exports
pub use attachment::AttachmentRepository;
pub use booking::BookingRepository;
pub use chat::ChatRepository;
pub use homestay::HomestayRepository;
pub use host::HostRepository;
pub use menu_item::MenuItemRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "homestay:abc".parse()?;
//   - 创建: RecordId::from_table_key("homestay", "abc")
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// 解析 API 传入的 ID — 接受 "table:key" 或裸 key
pub fn parse_record_id(table: &str, id: &str) -> RecordId {
    id.parse::<RecordId>()
        .ok()
        .filter(|rid| rid.table() == table)
        .unwrap_or_else(|| RecordId::from_table_key(table, id))
}

/// 从 Option<RecordId> 取出 "table:id" 字符串 (响应序列化辅助)
pub fn id_string(id: &Option<RecordId>) -> String {
    id.as_ref().map(|r| r.to_string()).unwrap_or_default()
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::parse_record_id;

    #[test]
    fn accepts_prefixed_and_bare_ids() {
        assert_eq!(
            parse_record_id("homestay", "homestay:abc").to_string(),
            "homestay:abc"
        );
        assert_eq!(parse_record_id("homestay", "abc").to_string(), "homestay:abc");
    }
}
