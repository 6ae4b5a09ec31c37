//! Attachment batch upload
//!
//! 尽力而为的批量上传：逐个文件顺序处理，单个文件的失败只记日志并
//! 跳过，绝不中断同批其他文件或整个请求。调用方自行过滤成功项。

use surrealdb::RecordId;
use thiserror::Error;

use crate::core::ServerState;
use crate::db::models::AttachmentNew;
use crate::db::repository::AttachmentRepository;
use crate::storage::BlobStorage;

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// One multipart file part, fully buffered
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Per-file upload failure
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid file: {0}")]
    Validation(String),

    #[error("blob store rejected file: {0}")]
    Blob(String),

    #[error("attachment metadata insert failed: {0}")]
    Metadata(String),
}

/// 批量上传：每个文件返回独立的 Result
///
/// 存活的附件 ID = blob 上传成功 ∩ 元数据插入成功。
pub async fn store_files(
    state: &ServerState,
    files: Vec<UploadFile>,
) -> Vec<Result<RecordId, UploadError>> {
    let repo = AttachmentRepository::new(state.db.clone());
    let mut results = Vec::with_capacity(files.len());

    // 文件按请求内顺序逐个处理
    for file in files {
        results.push(store_one(state, &repo, file).await);
    }

    results
}

async fn store_one(
    state: &ServerState,
    repo: &AttachmentRepository,
    file: UploadFile,
) -> Result<RecordId, UploadError> {
    validate_file(&file)?;

    let stored_name = BlobStorage::stored_file_name(&file.file_name);
    let file_type = resolve_mime(&file);

    state
        .storage
        .store(&stored_name, &file.data)
        .await
        .map_err(|e| UploadError::Blob(e.to_string()))?;

    let id = repo
        .insert(AttachmentNew {
            file_name: stored_name.clone(),
            file_type,
            uploaded_at: shared::util::now_millis(),
        })
        .await
        .map_err(|e| UploadError::Metadata(e.to_string()))?;

    tracing::info!(
        original_name = %file.file_name,
        stored_name = %stored_name,
        attachment_id = %id,
        "File uploaded"
    );

    Ok(id)
}

/// 单文件验证：非空、限长、内容可解码为图片
fn validate_file(file: &UploadFile) -> Result<(), UploadError> {
    if file.data.is_empty() {
        return Err(UploadError::Validation("empty file".to_string()));
    }
    if file.data.len() > MAX_FILE_SIZE {
        return Err(UploadError::Validation(format!(
            "file too large ({} bytes, max {} bytes)",
            file.data.len(),
            MAX_FILE_SIZE
        )));
    }
    if let Err(e) = image::load_from_memory(&file.data) {
        return Err(UploadError::Validation(format!("not a valid image: {}", e)));
    }
    Ok(())
}

/// MIME：优先取 multipart 头，缺省时按扩展名推断
fn resolve_mime(file: &UploadFile) -> String {
    if let Some(ct) = &file.content_type
        && !ct.is_empty()
    {
        return ct.clone();
    }
    mime_guess::from_path(&file.file_name)
        .first_or_octet_stream()
        .to_string()
}
