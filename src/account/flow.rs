//! Login/register flows. Every outcome - success, bad credentials, store
//! failure - ends as a message to the client; nothing here closes the
//! connection.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;

use super::password::Password;
use super::store::{AccountStore, StoreError};
use super::version::VersionChecker;
use crate::net::connection::Connection;
use crate::protocol::outgoing::{self, AlertKind};

const TEMP_PASSWORD_LEN: usize = 8;

pub struct AccountFlow {
    store: Arc<dyn AccountStore>,
    password: Password,
    version: VersionChecker,
}

impl AccountFlow {
    pub fn new(store: Arc<dyn AccountStore>, password: Password, version: VersionChecker) -> Self {
        Self { store, password, version }
    }

    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    /// Login. On success the connection learns its account id and receives
    /// AccessSuccessful.
    pub async fn access(
        &self,
        conn: &Arc<Connection>,
        email: &str,
        plain: &str,
        version: (i32, i32, i32),
    ) {
        if !self.version.check_and_alert(conn, version.0, version.1, version.2) {
            return;
        }
        if email.is_empty() || plain.is_empty() {
            warn(conn, "Email and password are mandatory.");
            return;
        }

        let account = match self.store.find_by_email(email).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn(conn, "Account not found.");
                return;
            }
            Err(e) => {
                store_error(conn, e);
                return;
            }
        };

        if !self.password.verify(plain, &account.password_hash) {
            warn(conn, "Wrong password.");
            return;
        }

        conn.set_account_id(account.id);
        conn.send(outgoing::access_successful());
        tracing::info!("[account] [access] connection {} is account {}", conn.id(), account.id);
    }

    /// Registration. Success is an info alert followed by AccountCreated.
    pub async fn create(
        &self,
        conn: &Arc<Connection>,
        email: &str,
        plain: &str,
        version: (i32, i32, i32),
    ) {
        if !self.version.check_and_alert(conn, version.0, version.1, version.2) {
            return;
        }
        if email.is_empty() || plain.is_empty() {
            warn(conn, "Email and password are mandatory.");
            return;
        }

        let hash = match self.password.hash(plain) {
            Ok(hash) => hash,
            Err(e) => {
                store_error(conn, e);
                return;
            }
        };

        match self.store.create(email, &hash).await {
            Ok(account) => {
                tracing::info!("[account] [create] account {} registered", account.id);
                conn.send(outgoing::alert(
                    AlertKind::Info,
                    "Your account has been successfully registered!",
                    false,
                ));
                conn.send(outgoing::account_created());
            }
            Err(StoreError::EmailTaken) => {
                warn(conn, "Account with this email already exists.");
            }
            Err(e) => store_error(conn, e),
        }
    }

    pub async fn delete(&self, conn: &Arc<Connection>, email: &str, plain: &str) {
        let account = match self.store.find_by_email(email).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn(conn, "Account not found.");
                return;
            }
            Err(e) => {
                store_error(conn, e);
                return;
            }
        };

        if !self.password.verify(plain, &account.password_hash) {
            warn(conn, "Wrong password.");
            return;
        }

        match self.store.delete(account.id).await {
            Ok(()) => {
                tracing::info!("[account] [delete] account {} removed", account.id);
                conn.send(outgoing::alert(
                    AlertKind::Info,
                    "Your account has been deleted.",
                    false,
                ));
            }
            Err(e) => store_error(conn, e),
        }
    }

    /// Issues a temporary password. Without a mail collaborator the
    /// temporary password is delivered in the alert itself.
    pub async fn recover(&self, conn: &Arc<Connection>, email: &str) {
        let account = match self.store.find_by_email(email).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn(conn, "Account not found.");
                return;
            }
            Err(e) => {
                store_error(conn, e);
                return;
            }
        };

        let temp: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TEMP_PASSWORD_LEN)
            .map(char::from)
            .collect();
        let hash = match self.password.hash(&temp) {
            Ok(hash) => hash,
            Err(e) => {
                store_error(conn, e);
                return;
            }
        };

        match self.store.update_password(account.id, &hash).await {
            Ok(()) => {
                tracing::info!("[account] [recover] password reset for account {}", account.id);
                conn.send(outgoing::alert(
                    AlertKind::Info,
                    &format!("A temporary password has been issued: {temp}"),
                    false,
                ));
            }
            Err(e) => store_error(conn, e),
        }
    }

    pub async fn change_password(
        &self,
        conn: &Arc<Connection>,
        email: &str,
        old_plain: &str,
        new_plain: &str,
    ) {
        if new_plain.is_empty() {
            warn(conn, "The new password must not be empty.");
            return;
        }

        let account = match self.store.find_by_email(email).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn(conn, "Account not found.");
                return;
            }
            Err(e) => {
                store_error(conn, e);
                return;
            }
        };

        if !self.password.verify(old_plain, &account.password_hash) {
            warn(conn, "Wrong password.");
            return;
        }

        let hash = match self.password.hash(new_plain) {
            Ok(hash) => hash,
            Err(e) => {
                store_error(conn, e);
                return;
            }
        };

        match self.store.update_password(account.id, &hash).await {
            Ok(()) => {
                tracing::info!("[account] [password] changed for account {}", account.id);
                conn.send(outgoing::alert(
                    AlertKind::Info,
                    "Your password has been changed.",
                    false,
                ));
            }
            Err(e) => store_error(conn, e),
        }
    }
}

fn warn(conn: &Arc<Connection>, message: &str) {
    conn.send(outgoing::alert(AlertKind::Warn, message, false));
}

fn store_error(conn: &Arc<Connection>, err: StoreError) {
    tracing::error!("[account] [store] connection {}: {}", conn.id(), err);
    conn.send(outgoing::alert(
        AlertKind::Error,
        "Something went wrong. Please try again.",
        false,
    ));
}
