use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use elara::account::{AccountFlow, AccountStore, MemoryAccountStore, Password, VersionChecker};
use elara::config::{MapConfig, StartPoint, VersionConfig};
use elara::game::world::World;
use elara::net::{self, ServerState};
use elara::requests;

async fn start_test_server() -> std::net::SocketAddr {
    let store: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
    let world = Arc::new(World::from_config(&[MapConfig {
        id: 1,
        name: "Harbor".to_string(),
        size_x: 100,
        size_y: 100,
    }]));
    let flow = Arc::new(AccountFlow::new(
        Arc::clone(&store),
        Password::with_cost(4),
        VersionChecker::new(VersionConfig::default()),
    ));
    let dispatcher = requests::build_dispatcher(
        Arc::clone(&world),
        flow,
        store,
        StartPoint { map: 1, x: 50, y: 50 },
    )
    .unwrap();
    let state = Arc::new(ServerState { world, dispatcher });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut next_id: u64 = 1;
        loop {
            let (stream, peer) = listener.accept().await.unwrap();
            let id = next_id;
            next_id += 1;
            let s = Arc::clone(&state);
            tokio::spawn(async move {
                net::handle_connection(s, stream, peer, id).await;
            });
        }
    });

    addr
}

fn frame(code: u16, build: impl FnOnce(&mut BytesMut)) -> Vec<u8> {
    let mut body = BytesMut::new();
    body.put_u16(code);
    build(&mut body);
    let mut out = Vec::new();
    out.extend_from_slice(&(body.len() as u16).to_be_bytes());
    out.extend_from_slice(&body);
    out
}

fn put_string(buf: &mut BytesMut, s: &str) {
    buf.put_u16(s.len() as u16);
    buf.put_slice(s.as_bytes());
}

async fn read_server_frame(stream: &mut TcpStream) -> Option<Bytes> {
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.ok()?;
    let len = u16::from_be_bytes(len_buf) as usize;
    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await.ok()?;
    Some(Bytes::from(payload))
}

fn header_code(frame: &Bytes) -> u16 {
    u16::from_be_bytes([frame[0], frame[1]])
}

async fn register_and_login(stream: &mut TcpStream, email: &str) {
    let create = frame(2, |b| {
        put_string(b, email);
        put_string(b, "hunter2");
        b.put_i32(0);
        b.put_i32(0);
        b.put_i32(0);
    });
    stream.write_all(&create).await.unwrap();
    // Alert (registered) + AccountCreated
    assert_eq!(header_code(&read_server_frame(stream).await.unwrap()), 3);
    assert_eq!(header_code(&read_server_frame(stream).await.unwrap()), 2);

    let access = frame(1, |b| {
        put_string(b, email);
        put_string(b, "hunter2");
        b.put_i32(0);
        b.put_i32(0);
        b.put_i32(0);
    });
    stream.write_all(&access).await.unwrap();
    assert_eq!(header_code(&read_server_frame(stream).await.unwrap()), 1);
}

/// Creates a character, selects it, and drains the join messages.
/// Returns nothing; panics on protocol surprises.
async fn enter_world(stream: &mut TcpStream, name: &str) {
    let create = frame(7, |b| {
        put_string(b, name);
        b.put_i8(1);
    });
    stream.write_all(&create).await.unwrap();
    // CharacterCreated
    assert_eq!(header_code(&read_server_frame(stream).await.unwrap()), 5);

    let list = frame(6, |_| {});
    stream.write_all(&list).await.unwrap();
    let chars = read_server_frame(stream).await.unwrap();
    assert_eq!(header_code(&chars), 4);
    let char_id = i32::from_be_bytes([chars[6], chars[7], chars[8], chars[9]]);

    let select = frame(9, |b| {
        b.put_i32(char_id);
    });
    stream.write_all(&select).await.unwrap();
    // CharacterSelected then NotifyExistingCharacters
    assert_eq!(header_code(&read_server_frame(stream).await.unwrap()), 7);
    assert_eq!(header_code(&read_server_frame(stream).await.unwrap()), 9);
}

#[tokio::test]
async fn test_ping_pong() {
    let addr = start_test_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();

    client.write_all(&frame(0, |_| {})).await.unwrap();

    let pong = read_server_frame(&mut client).await.unwrap();
    assert_eq!(header_code(&pong), 0);
}

#[tokio::test]
async fn test_unknown_type_code_closes_connection() {
    let addr = start_test_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();

    client.write_all(&frame(0x00FF, |_| {})).await.unwrap();

    // the server closes without replying
    assert!(read_server_frame(&mut client).await.is_none());
}

#[tokio::test]
async fn test_register_login_select() {
    let addr = start_test_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();

    register_and_login(&mut client, "ryn@elara.test").await;
    enter_world(&mut client, "Ryn").await;
}

#[tokio::test]
async fn test_move_is_broadcast_to_the_other_client_only() {
    let addr = start_test_server().await;

    let mut a = TcpStream::connect(addr).await.unwrap();
    register_and_login(&mut a, "a@elara.test").await;
    enter_world(&mut a, "Aria").await;

    let mut b = TcpStream::connect(addr).await.unwrap();
    register_and_login(&mut b, "b@elara.test").await;
    enter_world(&mut b, "Borin").await;

    // A hears B join
    assert_eq!(header_code(&read_server_frame(&mut a).await.unwrap()), 8);

    // B moves
    let mv = frame(10, |buf| {
        buf.put_i8(0);
        buf.put_i32(60);
        buf.put_i32(60);
        buf.put_i8(1);
        buf.put_i32(4);
        buf.put_i32(4);
    });
    b.write_all(&mv).await.unwrap();

    // A receives CharacterMoved
    let moved = read_server_frame(&mut a).await.unwrap();
    assert_eq!(header_code(&moved), 10);

    // B gets no echo; a ping answered with a pong proves the line is quiet
    b.write_all(&frame(0, |_| {})).await.unwrap();
    assert_eq!(header_code(&read_server_frame(&mut b).await.unwrap()), 0);
}

#[tokio::test]
async fn test_disconnect_broadcasts_to_remaining_client() {
    let addr = start_test_server().await;

    let mut a = TcpStream::connect(addr).await.unwrap();
    register_and_login(&mut a, "a2@elara.test").await;
    enter_world(&mut a, "Aldan").await;

    let mut b = TcpStream::connect(addr).await.unwrap();
    register_and_login(&mut b, "b2@elara.test").await;
    enter_world(&mut b, "Berin").await;

    // A hears B join
    assert_eq!(header_code(&read_server_frame(&mut a).await.unwrap()), 8);

    drop(b);

    // A receives CharacterDisconnected
    let gone = read_server_frame(&mut a).await.unwrap();
    assert_eq!(header_code(&gone), 11);
}
