//! Flappy Wukong: steer a monkey through gaps between scrolling sticks.
//!
//! The game core ([`game`], [`player`], [`obstacle`], [`background`]) is plain
//! data advanced by `tick(dt)` calls. Drawing ([`scene`], [`pixel`]) and sound
//! ([`audio`], [`synth`]) only read it.

pub mod audio;
pub mod background;
pub mod config;
pub mod game;
pub mod geometry;
pub mod obstacle;
pub mod pixel;
pub mod player;
pub mod scene;
pub mod synth;

pub use config::{Config, Variant};
pub use game::{Game, GameEvent, GameState};
