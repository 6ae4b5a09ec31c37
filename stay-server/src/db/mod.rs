//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) service and schema definition.
//! Tests use the in-memory engine through [`DbService::memory`].

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "stay";
const DATABASE: &str = "marketplace";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::init(db).await
    }

    /// In-memory database (tests, ephemeral runs)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database ready (SurrealDB, ns={NAMESPACE} db={DATABASE})");
        Ok(Self { db })
    }
}

/// Idempotent table/index definitions
///
/// SurrealDB 没有外键引用动作；民宿删除的级联在 repository 的事务里
/// 显式完成 (见 `repository::homestay`)。
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_username ON user FIELDS username UNIQUE;
        DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS host SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS host_user ON host FIELDS user UNIQUE;

        DEFINE TABLE IF NOT EXISTS homestay SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS attachment SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS homestay_attachment SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS booking SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS chat SCHEMALESS;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Schema definition failed: {e}")))?;

    Ok(())
}
