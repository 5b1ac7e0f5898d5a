//! In-memory account store, used by tests and database-less runs.

use std::sync::Mutex;

use async_trait::async_trait;

use super::store::{Account, AccountStore, CharRecord, StoreError};
use crate::game::character::Gender;

#[derive(Default)]
struct Inner {
    accounts: Vec<Account>,
    chars: Vec<CharRecord>,
    next_account_id: i64,
    next_char_id: i32,
}

#[derive(Default)]
pub struct MemoryAccountStore {
    inner: Mutex<Inner>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.accounts.iter().any(|a| a.email == email) {
            return Err(StoreError::EmailTaken);
        }
        inner.next_account_id += 1;
        let account = Account {
            id: inner.next_account_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        inner.accounts.push(account.clone());
        Ok(account)
    }

    async fn delete(&self, account_id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.accounts.retain(|a| a.id != account_id);
        inner.chars.retain(|c| c.account_id != account_id);
        Ok(())
    }

    async fn update_password(
        &self,
        account_id: i64,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(account) = inner.accounts.iter_mut().find(|a| a.id == account_id) {
            account.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn char_list(&self, account_id: i64) -> Result<Vec<CharRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .chars
            .iter()
            .filter(|c| c.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn create_char(
        &self,
        account_id: i64,
        name: &str,
        gender: Gender,
        map: i32,
        x: i32,
        y: i32,
    ) -> Result<CharRecord, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.chars.iter().any(|c| c.name == name) {
            return Err(StoreError::NameTaken);
        }
        inner.next_char_id += 1;
        let record = CharRecord {
            id: inner.next_char_id,
            account_id,
            name: name.to_string(),
            gender,
            map,
            x,
            y,
        };
        inner.chars.push(record.clone());
        Ok(record)
    }

    async fn delete_char(&self, account_id: i64, char_id: i32) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.chars.len();
        inner
            .chars
            .retain(|c| !(c.id == char_id && c.account_id == account_id));
        Ok(inner.chars.len() != before)
    }

    async fn find_char(
        &self,
        account_id: i64,
        char_id: i32,
    ) -> Result<Option<CharRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .chars
            .iter()
            .find(|c| c.id == char_id && c.account_id == account_id)
            .cloned())
    }
}
