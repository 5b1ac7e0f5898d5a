//! Account collaborator. Persistence lives behind the narrow
//! [`AccountStore`] trait; the flows here translate every outcome into
//! user-facing alerts so a store failure never tears down a connection.

pub mod flow;
pub mod memory;
pub mod password;
pub mod sql;
pub mod store;
pub mod version;

pub use flow::AccountFlow;
pub use memory::MemoryAccountStore;
pub use password::Password;
pub use sql::MySqlAccountStore;
pub use store::{Account, AccountStore, CharRecord, StoreError};
pub use version::VersionChecker;
