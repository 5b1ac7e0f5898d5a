//! One request handler per client header. Handlers decode their fixed
//! schema, call into the account flows or the world, and absorb every
//! recoverable failure as an alert.

pub mod access_account;
pub mod change_password;
pub mod char_list;
pub mod create_account;
pub mod create_char;
pub mod delete_account;
pub mod delete_char;
pub mod move_char;
pub mod ping;
pub mod recover_account;
pub mod select_char;

use std::sync::Arc;

use crate::account::{AccountFlow, AccountStore};
use crate::config::StartPoint;
use crate::game::world::World;
use crate::net::connection::Connection;
use crate::net::handler::{DispatchError, Dispatcher};
use crate::protocol::outgoing::{self, AlertKind};
use crate::protocol::ClientHeader;

/// Wires every handler into a dispatch table. Called once at startup.
pub fn build_dispatcher(
    world: Arc<World>,
    flow: Arc<AccountFlow>,
    store: Arc<dyn AccountStore>,
    start: StartPoint,
) -> Result<Dispatcher, DispatchError> {
    let mut dispatcher = Dispatcher::new();

    dispatcher.register(ClientHeader::Ping, Box::new(ping::PingRequest))?;
    dispatcher.register(
        ClientHeader::AccessAccount,
        Box::new(access_account::AccessAccountRequest::new(Arc::clone(&flow))),
    )?;
    dispatcher.register(
        ClientHeader::CreateAccount,
        Box::new(create_account::CreateAccountRequest::new(Arc::clone(&flow))),
    )?;
    dispatcher.register(
        ClientHeader::DeleteAccount,
        Box::new(delete_account::DeleteAccountRequest::new(Arc::clone(&flow))),
    )?;
    dispatcher.register(
        ClientHeader::RecoverAccount,
        Box::new(recover_account::RecoverAccountRequest::new(Arc::clone(&flow))),
    )?;
    dispatcher.register(
        ClientHeader::ChangePassword,
        Box::new(change_password::ChangePasswordRequest::new(flow)),
    )?;
    dispatcher.register(
        ClientHeader::CharList,
        Box::new(char_list::CharListRequest::new(Arc::clone(&store))),
    )?;
    dispatcher.register(
        ClientHeader::CreateChar,
        Box::new(create_char::CreateCharRequest::new(Arc::clone(&store), start)),
    )?;
    dispatcher.register(
        ClientHeader::DeleteChar,
        Box::new(delete_char::DeleteCharRequest::new(Arc::clone(&store))),
    )?;
    dispatcher.register(
        ClientHeader::SelectChar,
        Box::new(select_char::SelectCharRequest::new(Arc::clone(&world), store)),
    )?;
    dispatcher.register(ClientHeader::MoveChar, Box::new(move_char::MoveCharRequest::new(world)))?;

    Ok(dispatcher)
}

/// Session guard shared by the character requests: they all require a
/// logged-in account.
fn require_account(conn: &Arc<Connection>) -> Option<i64> {
    match conn.account_id() {
        Some(id) => Some(id),
        None => {
            conn.send(outgoing::alert(AlertKind::Warn, "You are not logged in.", false));
            None
        }
    }
}

fn store_error_alert(conn: &Arc<Connection>, err: crate::account::StoreError) {
    tracing::error!("[requests] [store] connection {}: {}", conn.id(), err);
    conn.send(outgoing::alert(
        AlertKind::Error,
        "Something went wrong. Please try again.",
        false,
    ));
}
