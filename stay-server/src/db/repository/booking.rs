//! Booking Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Booking, BookingNew};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let rid = parse_record_id(TABLE, id);
        let booking: Option<Booking> = self.base.db().select(rid).await?;
        Ok(booking)
    }

    /// Create a booking
    pub async fn create(&self, data: BookingNew) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// All bookings made by a guest
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE user = $user ORDER BY checkIn")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// All bookings across a host's homestays (record link traversal)
    pub async fn find_by_host(&self, host: &RecordId) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE homestay.host = $host ORDER BY checkIn")
            .bind(("host", host.clone()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Update booking status (host approve / cancel)
    pub async fn update_status(&self, id: &str, status: &str) -> RepoResult<Booking> {
        let rid = parse_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $b MERGE { status: $status } RETURN AFTER")
            .bind(("b", rid))
            .bind(("status", status.to_string()))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        bookings
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::STATUS_CONFIRMED;

    #[tokio::test]
    async fn bookings_reachable_by_host_traversal() {
        let service = DbService::memory().await.unwrap();
        let db = service.db;

        let host = RecordId::from_table_key("host", "h1");
        let guest = RecordId::from_table_key("user", "g1");

        // 民宿归属 h1
        db.query("CREATE homestay:s1 CONTENT { host: $host, name: 'Lakeview' }")
            .bind(("host", host.clone()))
            .await
            .unwrap()
            .check()
            .unwrap();

        let repo = BookingRepository::new(db);
        repo.create(BookingNew {
            user: guest.clone(),
            homestay: RecordId::from_table_key("homestay", "s1"),
            check_in: "2024-03-01".parse().unwrap(),
            check_out: "2024-03-05".parse().unwrap(),
            total_price: 400,
            food_selection: vec![],
            status: STATUS_CONFIRMED.to_string(),
        })
        .await
        .unwrap();

        let by_host = repo.find_by_host(&host).await.unwrap();
        assert_eq!(by_host.len(), 1);
        assert_eq!(by_host[0].total_price, 400);

        let by_user = repo.find_by_user(&guest).await.unwrap();
        assert_eq!(by_user.len(), 1);
    }
}
