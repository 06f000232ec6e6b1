//! End-to-end flows over real TCP connections: login, room setup,
//! the game-start broadcast, move broadcasts, and teardown on
//! disconnect.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use dots_protocol::{RoomStatus, ServerMessage};
use dots_server::config::Config;
use dots_server::server;

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = Config {
        bind_addr: addr.ip().to_string(),
        port: addr.port(),
        max_clients: 10,
        max_rooms: 10,
        enforce_turns: false,
    };
    tokio::spawn(async move {
        let _ = server::serve(listener, config).await;
    });
    addr
}

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, write) = stream.into_split();
        TestClient {
            lines: BufReader::new(read).lines(),
            write,
        }
    }

    async fn send(&mut self, raw: &str) {
        self.write.write_all(raw.as_bytes()).await.unwrap();
        self.write.write_all(b"\n").await.unwrap();
    }

    async fn recv(&mut self) -> ServerMessage {
        let line = timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timed out waiting for a server message")
            .unwrap()
            .expect("server closed the connection");
        serde_json::from_str(&line).unwrap()
    }
}

#[tokio::test]
async fn two_players_reach_a_started_game_and_exchange_moves() {
    let addr = start_server().await;

    let mut alice = TestClient::connect(addr).await;
    alice.send(r#"{"op":"LOGIN","user":"alice"}"#).await;
    assert!(matches!(alice.recv().await, ServerMessage::LoginOk { .. }));

    alice
        .send(r#"{"op":"CREATE_ROOM","room_id":"R1","grid_size":3}"#)
        .await;
    let ServerMessage::RoomJoined { room_id, player_num } = alice.recv().await else {
        panic!("expected ROOM_JOINED for the creator");
    };
    assert_eq!(room_id, "R1");
    assert_eq!(player_num, 0);

    let mut bob = TestClient::connect(addr).await;
    bob.send(r#"{"op":"LOGIN","user":"bob"}"#).await;
    assert!(matches!(bob.recv().await, ServerMessage::LoginOk { .. }));

    // The lobby shows the waiting room.
    bob.send(r#"{"op":"LIST_ROOMS"}"#).await;
    let ServerMessage::RoomList { rooms } = bob.recv().await else {
        panic!("expected ROOM_LIST");
    };
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_id, "R1");
    assert_eq!(rooms[0].status, RoomStatus::Waiting);
    assert_eq!(rooms[0].players, ["alice".to_string()]);

    bob.send(r#"{"op":"JOIN_ROOM","room_id":"R1"}"#).await;
    let ServerMessage::RoomJoined { player_num, .. } = bob.recv().await else {
        panic!("expected ROOM_JOINED for the joiner");
    };
    assert_eq!(player_num, 1);

    // Both seats get the start broadcast and the initial snapshot.
    for client in [&mut alice, &mut bob] {
        let ServerMessage::GameStart { player1, player2 } = client.recv().await else {
            panic!("expected GAME_START");
        };
        assert_eq!(player1, "alice");
        assert_eq!(player2, "bob");

        let ServerMessage::GameState { turn, scores, board, game_over, .. } = client.recv().await
        else {
            panic!("expected GAME_STATE");
        };
        assert_eq!(turn, 0);
        assert_eq!(scores, [0, 0]);
        assert!(!game_over);
        assert_eq!(board.horizontal, vec![vec![0u8; 3]; 4]);
        assert_eq!(board.vertical, vec![vec![0u8; 4]; 3]);
        assert_eq!(board.boxes, vec![vec![-1i8; 3]; 3]);
    }

    // A move is broadcast to both seats.
    alice
        .send(r#"{"op":"PLACE_LINE","x":0,"y":0,"orientation":"H"}"#)
        .await;
    for client in [&mut alice, &mut bob] {
        let ServerMessage::GameState { turn, board, .. } = client.recv().await else {
            panic!("expected GAME_STATE after a move");
        };
        assert_eq!(turn, 1);
        assert_eq!(board.horizontal[0][0], 1);
    }

    // Replaying the same edge is an error for the caller only: bob
    // sees the rejection, and the next thing alice sees is the
    // snapshot for bob's corrected move.
    bob.send(r#"{"op":"PLACE_LINE","x":0,"y":0,"orientation":"H"}"#)
        .await;
    let ServerMessage::Error { msg } = bob.recv().await else {
        panic!("expected ERROR for a duplicate line");
    };
    assert_eq!(msg, "Line already placed");

    bob.send(r#"{"op":"PLACE_LINE","x":0,"y":0,"orientation":"V"}"#)
        .await;
    for client in [&mut alice, &mut bob] {
        let ServerMessage::GameState { board, .. } = client.recv().await else {
            panic!("expected GAME_STATE after the corrected move");
        };
        assert_eq!(board.vertical[0][0], 1);
    }
}

#[tokio::test]
async fn garbage_and_unknown_ops_keep_the_connection_open() {
    let addr = start_server().await;

    let mut client = TestClient::connect(addr).await;
    client.send("this is not json").await;
    let ServerMessage::Error { msg } = client.recv().await else {
        panic!("expected ERROR for garbage input");
    };
    assert_eq!(msg, "Invalid JSON");

    client.send(r#"{"op":"DANCE"}"#).await;
    assert!(matches!(client.recv().await, ServerMessage::Error { .. }));

    // Still alive.
    client.send(r#"{"op":"PING"}"#).await;
    assert!(matches!(client.recv().await, ServerMessage::Pong));
}

#[tokio::test]
async fn room_operations_require_login_and_a_seat() {
    let addr = start_server().await;

    let mut client = TestClient::connect(addr).await;
    client
        .send(r#"{"op":"CREATE_ROOM","room_id":"R1"}"#)
        .await;
    let ServerMessage::Error { msg } = client.recv().await else {
        panic!("expected ERROR before login");
    };
    assert_eq!(msg, "Not logged in");

    client.send(r#"{"op":"LOGIN","user":"carol"}"#).await;
    assert!(matches!(client.recv().await, ServerMessage::LoginOk { .. }));

    client
        .send(r#"{"op":"PLACE_LINE","x":0,"y":0,"orientation":"H"}"#)
        .await;
    let ServerMessage::Error { msg } = client.recv().await else {
        panic!("expected ERROR without a room");
    };
    assert_eq!(msg, "Not in a room");
}

#[tokio::test]
async fn disconnect_dissolves_a_started_room_and_notifies_the_survivor() {
    let addr = start_server().await;

    let mut alice = TestClient::connect(addr).await;
    alice.send(r#"{"op":"LOGIN","user":"alice"}"#).await;
    alice.recv().await;
    alice
        .send(r#"{"op":"CREATE_ROOM","room_id":"R1","grid_size":3}"#)
        .await;
    alice.recv().await;

    let mut bob = TestClient::connect(addr).await;
    bob.send(r#"{"op":"LOGIN","user":"bob"}"#).await;
    bob.recv().await;
    bob.send(r#"{"op":"JOIN_ROOM","room_id":"R1"}"#).await;
    bob.recv().await; // ROOM_JOINED
    bob.recv().await; // GAME_START
    bob.recv().await; // GAME_STATE

    // Alice drops mid-game.
    drop(alice);

    let ServerMessage::Error { msg } = bob.recv().await else {
        panic!("expected the opponent-disconnected notification");
    };
    assert_eq!(msg, "Opponent disconnected. Room closed.");

    // The room is gone from the lobby.
    bob.send(r#"{"op":"LIST_ROOMS"}"#).await;
    let ServerMessage::RoomList { rooms } = bob.recv().await else {
        panic!("expected ROOM_LIST");
    };
    assert!(rooms.is_empty());
}
