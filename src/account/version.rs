use std::sync::Arc;

use crate::config::VersionConfig;
use crate::net::connection::Connection;
use crate::protocol::outgoing::{self, AlertKind};

/// Rejects clients whose reported version differs from the configured one.
pub struct VersionChecker {
    required: VersionConfig,
}

impl VersionChecker {
    pub fn new(required: VersionConfig) -> Self {
        Self { required }
    }

    pub fn matches(&self, major: i32, minor: i32, revision: i32) -> bool {
        self.required.major == major
            && self.required.minor == minor
            && self.required.revision == revision
    }

    /// Sends a critical alert on mismatch and reports whether the caller
    /// may continue.
    pub fn check_and_alert(
        &self,
        conn: &Arc<Connection>,
        major: i32,
        minor: i32,
        revision: i32,
    ) -> bool {
        if self.matches(major, minor, revision) {
            return true;
        }

        tracing::info!(
            "[account] [version] connection {} reported {}.{}.{}, required {}.{}.{}",
            conn.id(),
            major,
            minor,
            revision,
            self.required.major,
            self.required.minor,
            self.required.revision
        );
        conn.send(outgoing::alert(
            AlertKind::Error,
            &format!(
                "Your client is out of date. Required version: {}.{}.{}.",
                self.required.major, self.required.minor, self.required.revision
            ),
            true,
        ));
        false
    }
}
