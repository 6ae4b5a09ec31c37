//! Blob Storage
//!
//! 图片二进制对象的存储桶。对象以 `{millis}-{原始文件名}` 为键存放在
//! `work_dir/property-images/` 下，相当于原设计中外部对象存储的
//! `property-image` bucket。
//!
//! 对象键在读写删三个入口都做路径穿越检查。

use std::path::{Path, PathBuf};

use crate::utils::AppError;

/// Bucket directory name under work_dir
const BUCKET: &str = "property-images";

#[derive(Debug, Clone)]
pub struct BlobStorage {
    bucket_dir: PathBuf,
}

impl BlobStorage {
    /// Create the storage service rooted at `work_dir`
    pub fn new(work_dir: &Path) -> Self {
        Self {
            bucket_dir: work_dir.join(BUCKET),
        }
    }

    /// Ensure the bucket directory exists
    pub fn ensure_bucket(&self) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.bucket_dir)
            .map_err(|e| AppError::internal(format!("Failed to create bucket directory: {}", e)))
    }

    /// 生成碰撞安全的对象键：时间前缀 + 清洗后的原始文件名
    pub fn stored_file_name(original: &str) -> String {
        format!("{}-{}", shared::util::now_millis(), sanitize_file_name(original))
    }

    /// Store raw bytes under the given key
    pub async fn store(&self, file_name: &str, data: &[u8]) -> Result<(), AppError> {
        let path = self.object_path(file_name)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::upstream(format!("Failed to store object: {}", e)))
    }

    /// Read raw bytes for the given key
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, AppError> {
        let path = self.object_path(file_name)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| AppError::upstream(format!("Failed to read object: {}", e)))
    }

    /// Delete the object for the given key
    pub async fn delete(&self, file_name: &str) -> Result<(), AppError> {
        let path = self.object_path(file_name)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| AppError::upstream(format!("Failed to delete object: {}", e)))
    }

    /// Resolve an object key to a path inside the bucket
    ///
    /// Security check: prevent path traversal
    fn object_path(&self, file_name: &str) -> Result<PathBuf, AppError> {
        if file_name.is_empty()
            || file_name.contains("..")
            || file_name.contains('/')
            || file_name.contains('\\')
        {
            return Err(AppError::validation("Invalid file name".to_string()));
        }
        Ok(self.bucket_dir.join(file_name))
    }
}

/// 去掉路径成分，替换不可携带进对象键的字符
fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_file_name("lake view.png"), "lake_view.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("c:\\tmp\\x.png"), "x.png");
        assert_eq!(sanitize_file_name("..."), "file");
    }

    #[test]
    fn stored_names_carry_time_prefix() {
        let name = BlobStorage::stored_file_name("cabin.jpg");
        let (prefix, rest) = name.split_once('-').unwrap();
        assert!(prefix.parse::<i64>().is_ok());
        assert_eq!(rest, "cabin.jpg");
    }

    #[tokio::test]
    async fn store_read_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = BlobStorage::new(dir.path());
        storage.ensure_bucket().unwrap();

        storage.store("123-cabin.jpg", b"bytes").await.unwrap();
        assert_eq!(storage.read("123-cabin.jpg").await.unwrap(), b"bytes");

        storage.delete("123-cabin.jpg").await.unwrap();
        assert!(storage.read("123-cabin.jpg").await.is_err());
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = BlobStorage::new(dir.path());
        storage.ensure_bucket().unwrap();

        assert!(storage.read("../secret").await.is_err());
        assert!(storage.store("a/b.png", b"x").await.is_err());
        assert!(storage.delete("").await.is_err());
    }
}
