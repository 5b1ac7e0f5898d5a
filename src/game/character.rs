//! Mutable character state. Pure data: position and direction are mutated
//! only by the map that currently holds the character, and nothing here
//! touches a connection.

use super::CHAR_VELOCITY;

/// Compass facing, `i8` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(Self::North),
            1 => Some(Self::East),
            2 => Some(Self::South),
            3 => Some(Self::West),
            _ => None,
        }
    }

    pub fn as_i8(self) -> i8 {
        self as i8
    }
}

/// Display class of a character; the wire carries the display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(Self::Female),
            1 => Some(Self::Male),
            _ => None,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Unique across the whole world.
    pub id: i32,
    pub name: String,
    pub gender: Gender,
    /// Must equal the id of the map whose slot table holds this character.
    pub current_map: i32,
    pub map_x: i32,
    pub map_y: i32,
    pub direction: Direction,
    pub velocity_x: i32,
    pub velocity_y: i32,
}

impl Character {
    /// Builds the in-world state for a freshly selected character. Velocity
    /// starts at the world default; the select flow is the only caller.
    pub fn enter_world(id: i32, name: String, gender: Gender, map: i32, x: i32, y: i32) -> Self {
        Self {
            id,
            name,
            gender,
            current_map: map,
            map_x: x,
            map_y: y,
            direction: Direction::South,
            velocity_x: CHAR_VELOCITY,
            velocity_y: CHAR_VELOCITY,
        }
    }
}
