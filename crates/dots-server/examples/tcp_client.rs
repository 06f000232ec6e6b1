//! Interactive line client for poking at a running dots-server.
//!
//! Commands:
//!   login <name>
//!   create <room> [boxes-per-side]
//!   join <room>
//!   list
//!   place <x> <y> <H|V>
//!   ping
//!   quit

use std::env;
use std::error::Error;
use std::io::{self, Write};

use dots_protocol::{ClientMessage, WireOrientation};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("DOTS_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:50000".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected. Type 'help' for commands, 'quit' to leave.\n");

    let (read_half, mut write_half) = stream.into_split();

    // Print everything the server pushes, as it arrives.
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("<< {}", line);
        }
        println!("Server closed the connection.");
    });

    let stdin = io::stdin();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }
        if trimmed.eq_ignore_ascii_case("help") {
            println!("login <name> | create <room> [size] | join <room> | list | place <x> <y> <H|V> | ping");
            continue;
        }

        let msg = match parse_command(trimmed) {
            Some(m) => m,
            None => {
                eprintln!("Could not parse command. Type 'help'.");
                continue;
            }
        };

        let mut payload = serde_json::to_string(&msg)?;
        payload.push('\n');
        write_half.write_all(payload.as_bytes()).await?;
    }

    Ok(())
}

fn parse_command(input: &str) -> Option<ClientMessage> {
    let mut tokens = input.split_whitespace();
    let command = tokens.next()?;

    match command {
        "login" => Some(ClientMessage::Login {
            user: tokens.next()?.to_string(),
        }),
        "create" => {
            let room_id = tokens.next()?.to_string();
            let grid_size = match tokens.next() {
                Some(raw) => Some(raw.parse().ok()?),
                None => None,
            };
            Some(ClientMessage::CreateRoom { room_id, grid_size })
        }
        "join" => Some(ClientMessage::JoinRoom {
            room_id: tokens.next()?.to_string(),
        }),
        "list" => Some(ClientMessage::ListRooms),
        "place" => {
            let x = tokens.next()?.parse().ok()?;
            let y = tokens.next()?.parse().ok()?;
            let orientation = match tokens.next()? {
                "H" | "h" => WireOrientation::Horizontal,
                "V" | "v" => WireOrientation::Vertical,
                _ => return None,
            };
            Some(ClientMessage::PlaceLine { x, y, orientation })
        }
        "ping" => Some(ClientMessage::Ping),
        _ => None,
    }
}
