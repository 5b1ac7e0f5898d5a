//! MySQL-backed account store.

use async_trait::async_trait;
use sqlx::MySqlPool;

use super::store::{Account, AccountStore, CharRecord, StoreError};
use crate::game::character::Gender;

pub struct MySqlAccountStore {
    pool: MySqlPool,
}

impl MySqlAccountStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

fn record_from_row(row: (i32, i64, String, i8, i32, i32, i32)) -> CharRecord {
    let (id, account_id, name, gender, map, x, y) = row;
    CharRecord {
        id,
        account_id,
        name,
        gender: Gender::from_i8(gender).unwrap_or(Gender::Female),
        map,
        x,
        y,
    }
}

#[async_trait]
impl AccountStore for MySqlAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            "SELECT `AccId`, `AccEmail`, `AccPassword` FROM `Account` WHERE `AccEmail` = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, email, password_hash)| Account { id, email, password_hash }))
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        if self.find_by_email(email).await?.is_some() {
            return Err(StoreError::EmailTaken);
        }

        let result = sqlx::query("INSERT INTO `Account` (`AccEmail`, `AccPassword`) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(Account {
            id: result.last_insert_id() as i64,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    async fn delete(&self, account_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM `Character` WHERE `ChaAccountId` = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM `Account` WHERE `AccId` = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_password(
        &self,
        account_id: i64,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE `Account` SET `AccPassword` = ? WHERE `AccId` = ?")
            .bind(password_hash)
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn char_list(&self, account_id: i64) -> Result<Vec<CharRecord>, StoreError> {
        let rows: Vec<(i32, i64, String, i8, i32, i32, i32)> = sqlx::query_as(
            "SELECT `ChaId`, `ChaAccountId`, `ChaName`, `ChaGender`, `ChaMap`, `ChaX`, `ChaY`
             FROM `Character` WHERE `ChaAccountId` = ?",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_row).collect())
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
        let taken: Option<(i32,)> =
            sqlx::query_as("SELECT `ChaId` FROM `Character` WHERE `ChaName` = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        if taken.is_some() {
            return Err(StoreError::NameTaken);
        }

        let result = sqlx::query(
            "INSERT INTO `Character`
             (`ChaAccountId`, `ChaName`, `ChaGender`, `ChaMap`, `ChaX`, `ChaY`)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(account_id)
        .bind(name)
        .bind(gender.as_i8())
        .bind(map)
        .bind(x)
        .bind(y)
        .execute(&self.pool)
        .await?;

        Ok(CharRecord {
            id: result.last_insert_id() as i32,
            account_id,
            name: name.to_string(),
            gender,
            map,
            x,
            y,
        })
    }

    async fn delete_char(&self, account_id: i64, char_id: i32) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM `Character` WHERE `ChaId` = ? AND `ChaAccountId` = ?")
                .bind(char_id)
                .bind(account_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_char(
        &self,
        account_id: i64,
        char_id: i32,
    ) -> Result<Option<CharRecord>, StoreError> {
        let row: Option<(i32, i64, String, i8, i32, i32, i32)> = sqlx::query_as(
            "SELECT `ChaId`, `ChaAccountId`, `ChaName`, `ChaGender`, `ChaMap`, `ChaX`, `ChaY`
             FROM `Character` WHERE `ChaId` = ? AND `ChaAccountId` = ?",
        )
        .bind(char_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(record_from_row))
    }
}
