//! The shared simulation context.
//!
//! Every controller receives a `&mut World` for the duration of its update,
//! so a tick can be replayed in isolation against a hand-built world.

use crate::config::{
    IMPOSTOR_WIN_KILLS, KILL_COOLDOWN_MS, MEETING_COOLDOWN_MS, PLAYER_SPAWN_X, PLAYER_SPAWN_Y,
    VENT_COOLDOWN_MS,
};
use crate::map::Map;
use crate::types::{DeadBody, GameState, Heading, LifeState, Outcome, Point, Role, Room};
use log::info;
use std::collections::HashSet;

/// A countdown gating one ability. Never negative, never above `max_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    remaining_ms: u64,
    max_ms: u64,
}

impl Cooldown {
    pub fn new(max_ms: u64) -> Self {
        Cooldown {
            remaining_ms: 0,
            max_ms,
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn max_ms(&self) -> u64 {
        self.max_ms
    }

    pub fn is_ready(&self) -> bool {
        self.remaining_ms == 0
    }

    pub fn arm(&mut self) {
        self.remaining_ms = self.max_ms;
    }

    /// Decays the countdown, flooring at zero.
    pub fn tick(&mut self, elapsed_ms: u64) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldowns {
    pub kill: Cooldown,
    pub vent: Cooldown,
    pub meeting: Cooldown,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Cooldowns {
            kill: Cooldown::new(KILL_COOLDOWN_MS),
            vent: Cooldown::new(VENT_COOLDOWN_MS),
            meeting: Cooldown::new(MEETING_COOLDOWN_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Point,
    pub moving: bool, // Render hint, cleared by a scheduled event
}

// One bot lives in each room
#[derive(Debug, Clone, PartialEq)]
pub struct Bot {
    pub room: Room,
    pub position: Point,
    pub heading: Heading,
    pub life: LifeState,
    pub moving: bool,
}

impl Bot {
    pub fn new(room: Room) -> Self {
        Bot {
            room,
            position: room.bounds().center(),
            heading: Heading::EAST,
            life: LifeState::Alive,
            moving: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub map: Map,
    pub role: Role,
    pub state: GameState,
    pub player: Player,
    pub bots: Vec<Bot>, // Indexed by `Room::index`
    pub bodies: Vec<DeadBody>,
    pub reported: HashSet<usize>, // Indices into `bodies`
    pub cooldowns: Cooldowns,
    pub player_kills: u32,
    /// Bot secretly driven by the AI impostor controller (crewmate sessions only).
    pub impostor_bot: Option<Room>,
    /// Set once the impostor bot has been voted out.
    pub impostor_disabled: bool,
    pub outcome: Option<Outcome>,
    pub now_ms: u64,
}

impl World {
    pub fn new(map: Map, role: Role) -> Self {
        World {
            map,
            role,
            state: GameState::Playing,
            player: Player {
                position: Point::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
                moving: false,
            },
            bots: Room::ALL.iter().map(|room| Bot::new(*room)).collect(),
            bodies: Vec::new(),
            reported: HashSet::new(),
            cooldowns: Cooldowns::default(),
            player_kills: 0,
            impostor_bot: None,
            impostor_disabled: false,
            outcome: None,
            now_ms: 0,
        }
    }

    pub fn bot(&self, room: Room) -> &Bot {
        &self.bots[room.index()]
    }

    pub fn bot_mut(&mut self, room: Room) -> &mut Bot {
        &mut self.bots[room.index()]
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn alive_bot_count(&self) -> usize {
        self.bots.iter().filter(|bot| bot.is_alive()).count()
    }

    /// Shared kill side effects: the bot dies, stops, and optionally leaves a body.
    /// Returns false if the bot was already dead.
    pub fn kill_bot(&mut self, room: Room, leaves_body: bool) -> bool {
        let now_ms = self.now_ms;
        let bot = self.bot_mut(room);
        if !bot.is_alive() {
            return false;
        }
        bot.life = LifeState::Dead;
        bot.heading = Heading::ZERO;
        bot.moving = false;
        let position = bot.position;

        if leaves_body {
            self.bodies.push(DeadBody {
                room,
                position,
                time_of_death_ms: now_ms,
            });
        }
        info!(
            "{} bot ({}) killed at ({:.1}, {:.1})",
            room,
            room.bot_color(),
            position.x,
            position.y
        );
        true
    }

    /// Counts a kill by the player impostor and checks the kill-count win.
    pub fn record_kill(&mut self) {
        self.player_kills += 1;
        if self.player_kills >= IMPOSTOR_WIN_KILLS {
            self.declare_victory(Outcome::ImpostorKills);
        }
    }

    /// Total elimination: every bot is dead.
    pub fn check_all_bots_dead(&mut self) -> bool {
        if self.alive_bot_count() == 0 {
            self.declare_victory(Outcome::TotalElimination);
            return true;
        }
        false
    }

    /// Ends the session. The first declared outcome wins; later calls are ignored.
    pub fn declare_victory(&mut self, outcome: Outcome) {
        if self.is_over() {
            return;
        }
        let banner = outcome.banner();
        info!("Game over: {} {}", banner.title, banner.message);
        self.outcome = Some(outcome);
        self.state = GameState::GameOver;
    }
}
