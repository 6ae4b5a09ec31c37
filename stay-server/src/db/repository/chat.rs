//! Chat Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Chat, ChatMessage, ChatNew};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "chat";

#[derive(Clone)]
pub struct ChatRepository {
    base: BaseRepository,
}

impl ChatRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find chat by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Chat>> {
        let rid = parse_record_id(TABLE, id);
        let chat: Option<Chat> = self.base.db().select(rid).await?;
        Ok(chat)
    }

    /// All chats a guest participates in
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Chat>> {
        let chats: Vec<Chat> = self
            .base
            .db()
            .query("SELECT * FROM chat WHERE user = $user")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(chats)
    }

    /// All chats a host participates in
    pub async fn find_by_host(&self, host: &RecordId) -> RepoResult<Vec<Chat>> {
        let chats: Vec<Chat> = self
            .base
            .db()
            .query("SELECT * FROM chat WHERE host = $host")
            .bind(("host", host.clone()))
            .await?
            .take(0)?;
        Ok(chats)
    }

    /// 获取或创建一对 (user, host) 之间的会话
    pub async fn find_or_create(&self, user: RecordId, host: RecordId) -> RepoResult<Chat> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM chat WHERE user = $user AND host = $host LIMIT 1")
            .bind(("user", user.clone()))
            .bind(("host", host.clone()))
            .await?;
        let existing: Vec<Chat> = result.take(0)?;
        if let Some(chat) = existing.into_iter().next() {
            return Ok(chat);
        }

        let created: Option<Chat> = self
            .base
            .db()
            .create(TABLE)
            .content(ChatNew {
                user,
                host,
                messages: vec![],
            })
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create chat".to_string()))
    }

    /// Append a message to a chat
    pub async fn append_message(&self, id: &str, message: ChatMessage) -> RepoResult<Chat> {
        let rid = parse_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $c SET messages += $message RETURN AFTER")
            .bind(("c", rid))
            .bind(("message", message))
            .await?;
        let chats: Vec<Chat> = result.take(0)?;
        chats
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Chat {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn find_or_create_is_idempotent_and_appends() {
        let service = DbService::memory().await.unwrap();
        let repo = ChatRepository::new(service.db);

        let user = RecordId::from_table_key("user", "g1");
        let host = RecordId::from_table_key("host", "h1");

        let chat = repo
            .find_or_create(user.clone(), host.clone())
            .await
            .unwrap();
        let again = repo
            .find_or_create(user.clone(), host.clone())
            .await
            .unwrap();
        assert_eq!(chat.id, again.id);

        let id = chat.id.as_ref().unwrap().to_string();
        let updated = repo
            .append_message(
                &id,
                ChatMessage {
                    sender: "user".into(),
                    body: "Is the lake view room free in March?".into(),
                    sent_at: 1,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.messages.len(), 1);
        assert_eq!(updated.messages[0].sender, "user");
    }
}
