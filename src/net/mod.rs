//! TCP transport: accept loop, framing and per-connection tasks.
//!
//! Frames are a 2-byte big-endian length followed by that many payload
//! bytes. A single reader task per connection decodes and dispatches
//! strictly in receipt order; a writer task drains the outgoing channel.

pub mod connection;
pub mod handler;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Result};
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::game::world::World;
use crate::protocol::ClientMessage;
use connection::Connection;
use handler::Dispatcher;

/// Hard cap on a single frame; anything larger is a protocol violation.
pub const MAX_FRAME_LEN: usize = 8 * 1024;

/// Shared dependencies of every connection task.
pub struct ServerState {
    pub world: Arc<World>,
    pub dispatcher: Dispatcher,
}

/// Reads one length-prefixed frame. `None` means the peer closed cleanly
/// between frames.
pub async fn read_frame(stream: &mut (impl AsyncRead + Unpin)) -> Result<Option<Bytes>> {
    let mut len_buf = [0u8; 2];
    match stream.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u16::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        bail!("frame of {} bytes exceeds the {} byte limit", len, MAX_FRAME_LEN);
    }

    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await?;
    Ok(Some(Bytes::from(payload)))
}

/// Writes one length-prefixed frame.
pub async fn write_frame(stream: &mut (impl AsyncWrite + Unpin), frame: &[u8]) -> Result<()> {
    let len = u16::try_from(frame.len())?;
    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(frame).await?;
    Ok(())
}

/// Accept loop. Runs until the listener fails hard.
pub async fn run_server(state: Arc<ServerState>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("[net] [listen] accepting connections on {}", bind);

    let mut next_id: u64 = 1;
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let id = next_id;
                next_id += 1;
                tokio::spawn(handle_connection(Arc::clone(&state), stream, peer, id));
            }
            Err(e) => {
                tracing::error!("[net] [listen] accept error: {}", e);
            }
        }
    }
}

/// One session from accept to cleanup. When the transport drops, a still
/// active character is removed from its map before the connection goes
/// away.
pub async fn handle_connection(
    state: Arc<ServerState>,
    stream: TcpStream,
    peer: SocketAddr,
    id: u64,
) {
    let (mut reader, mut writer) = stream.into_split();
    let (conn, mut rx) = Connection::channel(id);

    let write_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if write_frame(&mut writer, &frame).await.is_err() {
                break;
            }
        }
    });

    tracing::info!("[net] [session] connection {} opened from {}", id, peer);

    loop {
        match read_frame(&mut reader).await {
            Ok(Some(frame)) => match ClientMessage::from_frame(frame) {
                Ok(msg) => {
                    state.dispatcher.dispatch(&conn, msg).await;
                    if conn.is_closed() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("[net] [session] connection {}: {}", id, e);
                    conn.close();
                    break;
                }
            },
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("[net] [session] connection {} read error: {}", id, e);
                break;
            }
        }
    }

    conn.close();

    if let Some(active) = conn.active_character() {
        if let Some(map) = state.world.get_map(active.map_id) {
            map.remove_character(active.char_id).await;
        }
        conn.clear_active_character();
    }

    // dropping the last sender ends the writer task once its queue drains;
    // map slots holding this connection were released just above
    drop(conn);
    let _ = write_task.await;

    tracing::info!("[net] [session] connection {} closed", id);
}
