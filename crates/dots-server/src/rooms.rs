//! Room registry: a bounded, id-keyed pool of two-player rooms.
//!
//! Concurrency discipline:
//! - The registry index (`id -> room`) sits behind an `RwLock`;
//!   structural changes (create, teardown) take it for write,
//!   everything else for read.
//! - Each room has its own `Mutex` serializing all seat and game
//!   mutation for that room. Room locks are only ever taken while
//!   the index lock is held, so a locked room is guaranteed to still
//!   be in the index, and by the time a writer holds the index no
//!   room lock is held by anyone.
//! - At most one room lock is held at a time, and nothing blocking
//!   happens under a lock: callers get back a state snapshot plus the
//!   recipient list and do their sending after every guard is gone.
//!
//! A room id is unique among *active* rooms only; the moment a room
//! is torn down its id may be reused.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use dots_core::{GameState, Orientation, PlaceError, Placement, Seat};

use crate::types::ClientId;

/// A connection bound to a seat.
#[derive(Debug, Clone)]
pub struct Occupant {
    pub client: ClientId,
    pub name: String,
}

/// One active room.
#[derive(Debug)]
pub struct Room {
    pub id: String,
    /// Seat 0 is the creator; seat 1 the joiner.
    pub seats: [Option<Occupant>; 2],
    pub game: GameState,
    /// Set the instant the second seat fills, never unset.
    pub started: bool,
    /// The box count the creator asked for, before clamping.
    pub requested_grid_size: usize,
}

impl Room {
    /// Which seat, if any, this client occupies.
    pub fn seat_of(&self, client: ClientId) -> Option<Seat> {
        if self.seats[0].as_ref().is_some_and(|o| o.client == client) {
            Some(Seat::One)
        } else if self.seats[1].as_ref().is_some_and(|o| o.client == client) {
            Some(Seat::Two)
        } else {
            None
        }
    }

    fn occupants(&self) -> Vec<ClientId> {
        self.seats.iter().flatten().map(|o| o.client).collect()
    }

    fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.id.clone(),
            player_count: self.seats.iter().flatten().count() as u8,
            grid_size: self.requested_grid_size,
            started: self.started,
            players: self.seats.iter().flatten().map(|o| o.name.clone()).collect(),
        }
    }
}

/// Failures of registry operations, each with the message text sent
/// back to the offending client.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Room exists")]
    RoomExists,

    #[error("No room slots")]
    NoCapacity,

    #[error("Room not found")]
    NotFound,

    #[error("You are already in this room")]
    SelfJoin,

    #[error("Room full")]
    Full,

    #[error("Not in this room")]
    NotSeated,

    /// A rule violation from the game engine.
    #[error(transparent)]
    Rule(#[from] PlaceError),
}

/// Result of a successful join: everything the caller needs for the
/// game-start broadcast, captured under the room lock.
#[derive(Debug)]
pub struct JoinOutcome {
    /// The seat the joiner landed in (always seat 1).
    pub seat: Seat,
    /// Display names, seat order.
    pub players: [String; 2],
    /// Both seated connections.
    pub recipients: [ClientId; 2],
    /// Initial game snapshot.
    pub snapshot: GameState,
}

/// Result of a successful placement.
#[derive(Debug)]
pub struct PlaceOutcome {
    pub seat: Seat,
    pub placed: Placement,
    pub snapshot: GameState,
    pub recipients: Vec<ClientId>,
}

/// What happened when a connection left.
#[derive(Debug)]
pub enum LeaveOutcome {
    /// The room became empty and its slot was freed.
    RoomFreed { room_id: String },

    /// A seat was cleared but the room stays open.
    SeatVacated { room_id: String },

    /// The room had started; the survivor must be notified and the
    /// room was dissolved rather than left half-populated.
    RoomDissolved { room_id: String, notify: Occupant },
}

/// One room summary for `LIST_ROOMS`.
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub room_id: String,
    pub player_count: u8,
    pub grid_size: usize,
    pub started: bool,
    pub players: Vec<String>,
}

/// Bounded pool of active rooms.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Mutex<Room>>>>,
    max_rooms: usize,
    enforce_turns: bool,
}

impl RoomRegistry {
    pub fn new(max_rooms: usize, enforce_turns: bool) -> Self {
        RoomRegistry {
            rooms: RwLock::new(HashMap::new()),
            max_rooms,
            enforce_turns,
        }
    }

    /// Create a room and seat the creator in seat 0.
    pub async fn create(
        &self,
        room_id: &str,
        client: ClientId,
        name: &str,
        grid_size: usize,
    ) -> Result<(), RegistryError> {
        let mut rooms = self.rooms.write().await;

        if rooms.contains_key(room_id) {
            return Err(RegistryError::RoomExists);
        }
        if rooms.len() >= self.max_rooms {
            return Err(RegistryError::NoCapacity);
        }

        let room = Room {
            id: room_id.to_string(),
            seats: [
                Some(Occupant {
                    client,
                    name: name.to_string(),
                }),
                None,
            ],
            game: GameState::new(grid_size, self.enforce_turns),
            started: false,
            requested_grid_size: grid_size,
        };
        rooms.insert(room_id.to_string(), Arc::new(Mutex::new(room)));
        Ok(())
    }

    /// Look up an active room by id.
    pub async fn find(&self, room_id: &str) -> Option<RoomSummary> {
        let rooms = self.rooms.read().await;
        let slot = rooms.get(room_id)?;
        let room = slot.lock().await;
        Some(room.summary())
    }

    /// Seat a client in seat 1 of an existing room, starting the game.
    ///
    /// Of two racing joiners exactly one succeeds: both serialize on
    /// the room lock and the loser sees seat 1 occupied.
    pub async fn join(
        &self,
        room_id: &str,
        client: ClientId,
        name: &str,
    ) -> Result<JoinOutcome, RegistryError> {
        let rooms = self.rooms.read().await;
        let slot = rooms.get(room_id).ok_or(RegistryError::NotFound)?;
        let mut room = slot.lock().await;

        if room.seat_of(client) == Some(Seat::One) {
            return Err(RegistryError::SelfJoin);
        }
        if room.seats[1].is_some() {
            return Err(RegistryError::Full);
        }
        let Some(creator) = room.seats[0].clone() else {
            // Unreachable while the index invariant holds; treat a
            // creatorless room as gone.
            return Err(RegistryError::NotFound);
        };

        room.seats[1] = Some(Occupant {
            client,
            name: name.to_string(),
        });
        room.started = true;

        Ok(JoinOutcome {
            seat: Seat::Two,
            players: [creator.name, name.to_string()],
            recipients: [creator.client, client],
            snapshot: room.game.clone(),
        })
    }

    /// Apply one line placement on behalf of `client`.
    ///
    /// The acting seat is resolved by matching the client against the
    /// room's seats; rule checks are the engine's.
    pub async fn place_line(
        &self,
        room_id: &str,
        client: ClientId,
        x: i32,
        y: i32,
        orientation: Orientation,
    ) -> Result<PlaceOutcome, RegistryError> {
        let rooms = self.rooms.read().await;
        let slot = rooms.get(room_id).ok_or(RegistryError::NotFound)?;
        let mut room = slot.lock().await;

        let seat = room.seat_of(client).ok_or(RegistryError::NotSeated)?;
        let placed = room.game.place_line(x, y, orientation, seat)?;

        Ok(PlaceOutcome {
            seat,
            placed,
            snapshot: room.game.clone(),
            recipients: room.occupants(),
        })
    }

    /// Clear `client`'s seat wherever it is seated.
    ///
    /// An emptied room is freed. A started room never continues with
    /// one seat empty: the survivor is reported back for notification
    /// and the room is dissolved.
    pub async fn leave(&self, client: ClientId) -> Option<LeaveOutcome> {
        let mut rooms = self.rooms.write().await;

        let mut found: Option<(String, Seat)> = None;
        for (id, slot) in rooms.iter() {
            let room = slot.lock().await;
            if let Some(seat) = room.seat_of(client) {
                found = Some((id.clone(), seat));
                break;
            }
        }
        let (id, seat) = found?;

        let slot = Arc::clone(rooms.get(&id)?);
        let mut room = slot.lock().await;
        room.seats[seat.index()] = None;

        let survivor = room.seats.iter().flatten().next().cloned();
        match survivor {
            None => {
                drop(room);
                rooms.remove(&id);
                Some(LeaveOutcome::RoomFreed { room_id: id })
            }
            Some(occupant) if room.started => {
                room.seats = [None, None];
                drop(room);
                rooms.remove(&id);
                Some(LeaveOutcome::RoomDissolved {
                    room_id: id,
                    notify: occupant,
                })
            }
            Some(_) => Some(LeaveOutcome::SeatVacated { room_id: id }),
        }
    }

    /// Per-room snapshots of all active, not-yet-finished rooms.
    ///
    /// Best-effort: rooms are locked one at a time, so the listing
    /// may interleave with mutation of other rooms.
    pub async fn list(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.read().await;

        let mut out = Vec::with_capacity(rooms.len());
        for slot in rooms.values() {
            let room = slot.lock().await;
            if room.game.is_over() {
                continue;
            }
            out.push(room.summary());
        }
        out
    }
}
