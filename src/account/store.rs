use async_trait::async_trait;

use crate::game::character::Gender;

#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Persisted character row, as opposed to the live in-map `Character`.
#[derive(Debug, Clone)]
pub struct CharRecord {
    pub id: i32,
    pub account_id: i64,
    pub name: String,
    pub gender: Gender,
    pub map: i32,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("account with this email already exists")]
    EmailTaken,

    #[error("character name already taken")]
    NameTaken,

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Narrow persistence interface the session layer depends on. Everything
/// else about accounts (schema, migrations, indexing) is out of scope.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, StoreError>;

    async fn delete(&self, account_id: i64) -> Result<(), StoreError>;

    async fn update_password(&self, account_id: i64, password_hash: &str)
        -> Result<(), StoreError>;

    async fn char_list(&self, account_id: i64) -> Result<Vec<CharRecord>, StoreError>;

    #[allow(clippy::too_many_arguments)]
    async fn create_char(
        &self,
        account_id: i64,
        name: &str,
        gender: Gender,
        map: i32,
        x: i32,
        y: i32,
    ) -> Result<CharRecord, StoreError>;

    /// Returns whether a character was actually deleted.
    async fn delete_char(&self, account_id: i64, char_id: i32) -> Result<bool, StoreError>;

    async fn find_char(&self, account_id: i64, char_id: i32)
        -> Result<Option<CharRecord>, StoreError>;
}
