//! Attachment Model
//!
//! 附件元数据行描述一个已上传的二进制文件 (图片)。附件独立于民宿创建，
//! 只有被 link 行关联后才有业务意义。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Attachment ID type
pub type AttachmentId = RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AttachmentId>,
    /// Blob 存储中的对象键 (时间前缀 + 原始文件名)
    pub file_name: String,
    /// MIME type
    pub file_type: String,
    /// 上传时间 (Unix millis)
    #[serde(default)]
    pub uploaded_at: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentNew {
    pub file_name: String,
    pub file_type: String,
    pub uploaded_at: i64,
}

/// 详情接口返回的照片元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(with = "serde_helpers::record_id")]
    pub id: AttachmentId,
    pub file_name: String,
    pub file_type: String,
}
