//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserNew};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = parse_record_id(TABLE, id);
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    /// Find user by username or email (registration duplicate check, login)
    pub async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        let login_owned = login.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $login OR email = $login LIMIT 1")
            .bind(("login", login_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user where username or email matches (either may differ)
    pub async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username OR email = $email LIMIT 1")
            .bind(("username", username.to_string()))
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, data: UserNew) -> RepoResult<User> {
        let created: Option<User> = self.base.db().create(TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
