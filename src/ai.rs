//! Hidden AI impostor: one bot that teleports next to its prey and hunts it down.

use crate::config::{AI_IMPOSTOR_SPEED, AI_KILL_DELAY_MS, AI_KILL_PROXIMITY, AI_START_DELAY_MS};
use crate::types::{GameState, Outcome, Point, Role, Room};
use crate::world::World;
use log::info;
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    Waiting,
    Teleporting,
    Hunting,
    Cooldown,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct AiImpostor {
    pub bot: Room,
    state: AiState,
    target: Option<Room>,
    kills: u32,
    start_ms: u64,
    last_kill_ms: u64,
}

impl AiImpostor {
    pub fn new(bot: Room, start_ms: u64) -> Self {
        AiImpostor {
            bot,
            state: AiState::Waiting,
            target: None,
            kills: 0,
            start_ms,
            last_kill_ms: 0,
        }
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn target(&self) -> Option<Room> {
        self.target
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    fn transition(&mut self, next: AiState) {
        if self.state != next {
            crate::debug_ai!("{} impostor: {:?} -> {:?}", self.bot, self.state, next);
            self.state = next;
        }
    }

    /// Runs one tick of the behavior machine. A state may hand over to the
    /// next one within the same tick (cooldown expiry teleports immediately,
    /// a teleport starts hunting immediately).
    pub fn update<R: Rng + ?Sized>(&mut self, world: &mut World, rng: &mut R) {
        if self.state == AiState::Disabled {
            return;
        }
        if world.role != Role::Crewmate || world.state != GameState::Playing {
            return;
        }
        if world.impostor_disabled || !world.bot(self.bot).is_alive() {
            self.target = None;
            self.transition(AiState::Disabled);
            return;
        }

        let now_ms = world.now_ms;
        match self.state {
            AiState::Waiting if now_ms.saturating_sub(self.start_ms) >= AI_START_DELAY_MS => {
                self.transition(AiState::Teleporting)
            }
            AiState::Cooldown if now_ms.saturating_sub(self.last_kill_ms) >= AI_KILL_DELAY_MS => {
                self.transition(AiState::Teleporting)
            }
            AiState::Waiting | AiState::Cooldown => return,
            _ => {}
        }

        if self.state == AiState::Teleporting {
            self.teleport(world, rng);
        }
        if self.state == AiState::Hunting {
            self.hunt(world);
        }
    }

    fn teleport<R: Rng + ?Sized>(&mut self, world: &mut World, rng: &mut R) {
        let candidates: Vec<Room> = world
            .bots
            .iter()
            .filter(|bot| bot.is_alive() && bot.room != self.bot)
            .map(|bot| bot.room)
            .collect();

        // Nobody left to hunt: idle until something changes
        let Some(destination) = candidates.choose(rng).copied() else {
            return;
        };

        let arrival = world.map.room_center(destination);
        let me = world.bot_mut(self.bot);
        me.position = arrival;
        me.moving = true;

        self.target = candidates
            .iter()
            .map(|room| (*room, arrival.distance(&world.bot(*room).position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(room, _)| room);

        crate::debug_ai!(
            "{} impostor teleported to {}, hunting {:?}",
            self.bot,
            destination,
            self.target
        );
        self.transition(AiState::Hunting);
    }

    fn hunt(&mut self, world: &mut World) {
        let target = match self.target {
            Some(target) if world.bot(target).is_alive() => target,
            // Prey vanished (ejected in a meeting): pick again next tick
            _ => {
                self.target = None;
                self.transition(AiState::Teleporting);
                return;
            }
        };

        let me = world.bot(self.bot).position;
        let prey = world.bot(target).position;
        let dx = prey.x - me.x;
        let dy = prey.y - me.y;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance < AI_KILL_PROXIMITY {
            world.kill_bot(target, true);
            self.kills += 1;
            self.last_kill_ms = world.now_ms;
            self.target = None;
            self.transition(AiState::Cooldown);
            info!("AI impostor has {} kill(s)", self.kills);

            // Only the impostor bot itself is left standing
            if world.alive_bot_count() <= 1 {
                world.declare_victory(Outcome::AiImpostorWins);
            }
            return;
        }

        let candidate = Point::new(
            me.x + dx / distance * AI_IMPOSTOR_SPEED,
            me.y + dy / distance * AI_IMPOSTOR_SPEED,
        );
        if world.map.is_valid_position(candidate) {
            let bot = world.bot_mut(self.bot);
            bot.position = candidate;
            bot.moving = true;
        }
    }
}
