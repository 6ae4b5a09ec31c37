//! Homestay Repository
//!
//! 民宿写路径的多表工作流都包在单条 BEGIN/COMMIT 查询里，避免
//! 民宿行与附件 link 行之间出现部分写入。

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Homestay, HomestayNew, HomestayUpdate, Photo};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "homestay";

#[derive(Clone)]
pub struct HomestayRepository {
    base: BaseRepository,
}

impl HomestayRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find homestay by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Homestay>> {
        let rid = parse_record_id(TABLE, id);
        let homestay: Option<Homestay> = self.base.db().select(rid).await?;
        Ok(homestay)
    }

    /// Find all homestays owned by a host
    pub async fn find_by_host(&self, host: &RecordId) -> RepoResult<Vec<Homestay>> {
        let homestays: Vec<Homestay> = self
            .base
            .db()
            .query("SELECT * FROM homestay WHERE host = $host ORDER BY createdAt")
            .bind(("host", host.clone()))
            .await?
            .take(0)?;
        Ok(homestays)
    }

    /// Find homestays that carry coordinates (location search)
    pub async fn find_with_coordinates(&self) -> RepoResult<Vec<Homestay>> {
        let homestays: Vec<Homestay> = self
            .base
            .db()
            .query("SELECT * FROM homestay WHERE location.lat != NONE AND location.long != NONE")
            .await?
            .take(0)?;
        Ok(homestays)
    }

    /// 事务：创建民宿并为每个存活的附件 ID 写入一条 link 行
    ///
    /// 民宿行先于 link 行写入，满足 link 对民宿的引用依赖。
    pub async fn create_with_links(
        &self,
        data: HomestayNew,
        attachment_ids: &[RecordId],
    ) -> RepoResult<Homestay> {
        let mut result = self
            .base
            .db()
            .query(
                "
                BEGIN TRANSACTION;
                LET $h = (CREATE ONLY homestay CONTENT $data);
                FOR $aid IN $attachments {
                    CREATE homestay_attachment CONTENT { homestay: $h.id, attachment: $aid };
                };
                RETURN $h;
                COMMIT TRANSACTION;
                ",
            )
            .bind(("data", data))
            .bind(("attachments", attachment_ids.to_vec()))
            .await?
            .check()?;

        let last = result.num_statements() - 1;
        let created: Option<Homestay> = result.take(last)?;
        created.ok_or_else(|| RepoError::Database("Failed to create homestay".to_string()))
    }

    /// 事务：更新民宿
    ///
    /// 1. 删除 `deleted` 中附件的 link 行，再删除附件行本身
    /// 2. MERGE 民宿字段 (全量覆盖语义在 [`HomestayUpdate`] 上表达)
    /// 3. 为新上传的附件写入 link 行
    pub async fn update_with_links(
        &self,
        id: &str,
        data: HomestayUpdate,
        deleted: &[RecordId],
        added: &[RecordId],
    ) -> RepoResult<()> {
        let rid = parse_record_id(TABLE, id);
        self.base
            .db()
            .query(
                "
                BEGIN TRANSACTION;
                FOR $aid IN $deleted {
                    DELETE homestay_attachment WHERE homestay = $h AND attachment = $aid;
                    DELETE $aid;
                };
                UPDATE $h MERGE $data;
                FOR $aid IN $added {
                    CREATE homestay_attachment CONTENT { homestay: $h, attachment: $aid };
                };
                COMMIT TRANSACTION;
                ",
            )
            .bind(("h", rid))
            .bind(("data", data))
            .bind(("deleted", deleted.to_vec()))
            .bind(("added", added.to_vec()))
            .await?
            .check()?;
        Ok(())
    }

    /// 事务：删除民宿并级联清理 link 行、预订和餐品
    ///
    /// SurrealDB 没有外键级联，这里承担原设计中存储层
    /// `ON DELETE CASCADE` 的职责。附件行不随民宿删除 (与原行为一致)。
    pub async fn delete_cascade(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id);
        self.base
            .db()
            .query(
                "
                BEGIN TRANSACTION;
                DELETE homestay_attachment WHERE homestay = $h;
                DELETE booking WHERE homestay = $h;
                DELETE menu_item WHERE homestay = $h;
                DELETE $h;
                COMMIT TRANSACTION;
                ",
            )
            .bind(("h", rid))
            .await?
            .check()?;
        Ok(true)
    }

    /// 民宿关联的附件 ID 列表
    pub async fn find_attachment_ids(&self, id: &str) -> RepoResult<Vec<RecordId>> {
        let rid = parse_record_id(TABLE, id);
        let ids: Vec<RecordId> = self
            .base
            .db()
            .query("SELECT VALUE attachment FROM homestay_attachment WHERE homestay = $h")
            .bind(("h", rid))
            .await?
            .take(0)?;
        Ok(ids)
    }

    /// 民宿关联的照片元数据 (link 行与附件行 join)
    pub async fn find_photos(&self, id: &str) -> RepoResult<Vec<Photo>> {
        let rid = parse_record_id(TABLE, id);
        let photos: Vec<Photo> = self
            .base
            .db()
            .query(
                "SELECT attachment.id AS id, attachment.fileName AS fileName, \
                 attachment.fileType AS fileType \
                 FROM homestay_attachment WHERE homestay = $h",
            )
            .bind(("h", rid))
            .await?
            .take(0)?;
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{AttachmentNew, AvailabilitySlot, Location};
    use crate::db::repository::AttachmentRepository;

    async fn setup() -> (HomestayRepository, AttachmentRepository, RecordId) {
        let service = DbService::memory().await.unwrap();
        let host = RecordId::from_table_key("host", "testhost");
        (
            HomestayRepository::new(service.db.clone()),
            AttachmentRepository::new(service.db),
            host,
        )
    }

    fn lakeview(host: RecordId) -> HomestayNew {
        HomestayNew {
            host,
            name: "Lakeview".to_string(),
            description: None,
            location: Location {
                address: "123 Lake Rd".to_string(),
                city: None,
                country: None,
                lat: None,
                long: None,
            },
            price_per_night: 100,
            amenities: vec![],
            rating: 0,
            availability: vec![AvailabilitySlot {
                date: "2024-02-01".parse().unwrap(),
                is_available: true,
            }],
            created_at: 0,
            updated_at: 0,
        }
    }

    async fn insert_attachment(repo: &AttachmentRepository, name: &str) -> RecordId {
        repo.insert(AttachmentNew {
            file_name: name.to_string(),
            file_type: "image/png".to_string(),
            uploaded_at: 0,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_without_attachments_has_no_links() {
        let (repo, _, host) = setup().await;
        let created = repo.create_with_links(lakeview(host), &[]).await.unwrap();

        let id = created.id.as_ref().unwrap().to_string();
        assert_eq!(created.rating, 0);
        assert!(repo.find_attachment_ids(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_links_every_surviving_attachment() {
        let (repo, attachments, host) = setup().await;
        let a1 = insert_attachment(&attachments, "a1.png").await;
        let a2 = insert_attachment(&attachments, "a2.png").await;

        let created = repo
            .create_with_links(lakeview(host), &[a1.clone(), a2.clone()])
            .await
            .unwrap();

        let id = created.id.as_ref().unwrap().to_string();
        let linked = repo.find_attachment_ids(&id).await.unwrap();
        assert_eq!(linked.len(), 2);
        assert!(linked.contains(&a1));
        assert!(linked.contains(&a2));
    }

    #[tokio::test]
    async fn update_removes_exactly_the_requested_attachments() {
        let (repo, attachments, host) = setup().await;
        let a1 = insert_attachment(&attachments, "a1.png").await;
        let a2 = insert_attachment(&attachments, "a2.png").await;
        let a3 = insert_attachment(&attachments, "a3.png").await;

        let created = repo
            .create_with_links(lakeview(host.clone()), &[a1.clone(), a2.clone(), a3.clone()])
            .await
            .unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let update = HomestayUpdate {
            host,
            name: "Lakeview".to_string(),
            description: None,
            location: created.location.clone(),
            price_per_night: 120,
            amenities: vec![],
            availability: created.availability.clone(),
            updated_at: 1,
        };
        repo.update_with_links(&id, update, &[a1.clone(), a2.clone()], &[])
            .await
            .unwrap();

        let linked = repo.find_attachment_ids(&id).await.unwrap();
        assert_eq!(linked, vec![a3]);

        // 被删除的附件行本身也应消失
        assert!(
            attachments
                .find_by_id(&a1.to_string())
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            attachments
                .find_by_id(&a2.to_string())
                .await
                .unwrap()
                .is_none()
        );

        let updated = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(updated.price_per_night, 120);
        assert_eq!(updated.rating, 0);
    }

    #[tokio::test]
    async fn delete_cascade_removes_links() {
        let (repo, attachments, host) = setup().await;
        let a1 = insert_attachment(&attachments, "a1.png").await;

        let created = repo
            .create_with_links(lakeview(host), &[a1])
            .await
            .unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        assert!(repo.delete_cascade(&id).await.unwrap());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        assert!(repo.find_attachment_ids(&id).await.unwrap().is_empty());
    }
}
