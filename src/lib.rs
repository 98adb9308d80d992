//! Client-side simulation of a social-deduction round: a player, eight room
//! bots, one hidden impostor and the meeting/vent/kill abilities around them.

pub mod abilities;
pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod map;
pub mod movement;
pub mod render;
pub mod reporting;
pub mod scheduler;
pub mod types;
pub mod world;
