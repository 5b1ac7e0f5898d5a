//! Authoritative world state: characters, maps and the slot table.

pub mod character;
pub mod map;
pub mod slots;
pub mod world;

use std::time::Duration;

/// Slot table capacity of every map.
pub const MAX_MAP_CHARACTERS: usize = 500;

/// Period of each map's background tick.
pub const MAP_TICK: Duration = Duration::from_millis(500);

/// Velocity a character starts with when it enters the world.
pub const CHAR_VELOCITY: i32 = 4;
