use crate::abilities::{self, BallotEntry, VoteResult};
use crate::ai::AiImpostor;
use crate::config::{
    CREWMATE_PROBABILITY, KEY_REPEAT_DELAY_MS, KEY_REPEAT_MS, MOVE_PULSE_MS, ROLE_BANNER_MS,
    TICK_MS, TOUCH_POLL_MS,
};
use crate::error::ActionError;
use crate::input::{HeldDirections, Joystick, Key};
use crate::map::Map;
use crate::movement;
use crate::render::Renderer;
use crate::reporting;
use crate::scheduler::Scheduler;
use crate::types::{Banner, GameState, Point, Role, Room};
use crate::world::World;
use log::info;
use macroquad::prelude::{get_frame_time, next_frame};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Everything that happens on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick,
    TouchPoll,
    KeyRepeat,
    DismissRoleBanner,
    EndPlayerPulse,
    EndBotPulse(Room),
}

/// Session setup. Unset fields are drawn from the seeded generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub seed: u64,
    pub role: Option<Role>,
    pub impostor_bot: Option<Room>,
}

/// 60% crewmate, 40% impostor.
pub fn draw_role<R: Rng + ?Sized>(rng: &mut R) -> Role {
    if rng.gen_bool(CREWMATE_PROBABILITY) {
        Role::Crewmate
    } else {
        Role::Impostor
    }
}

/// The Game struct owns the world and drives it: fixed-rate ticks from the
/// scheduler, player input applied immediately between ticks.
pub struct Game {
    pub world: World,
    ai: Option<AiImpostor>,
    rng: StdRng,
    scheduler: Scheduler<Event>,
    held: HashSet<Key>,
    held_since_ms: u64,
    joystick: Joystick,
    role_banner_visible: bool,
    player_pulse_until: u64,
    bot_pulse_until: [u64; 8],
}

impl Game {
    pub fn new(options: SessionOptions) -> Self {
        let mut rng = StdRng::seed_from_u64(options.seed);
        let role = options.role.unwrap_or_else(|| draw_role(&mut rng));
        info!("Session seed {}: player is {}", options.seed, role);

        let mut world = World::new(Map::new(), role);

        // Only crew sessions get a hidden impostor among the bots
        let ai = match role {
            Role::Crewmate => {
                let bot = options
                    .impostor_bot
                    .or_else(|| Room::ALL.choose(&mut rng).copied())
                    .unwrap_or(Room::Cafeteria);
                world.impostor_bot = Some(bot);
                crate::debug_ai!("AI impostor is the {} bot", bot);
                Some(AiImpostor::new(bot, 0))
            }
            Role::Impostor => None,
        };

        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(TICK_MS, Event::Tick);
        scheduler.schedule_in(TOUCH_POLL_MS, Event::TouchPoll);
        scheduler.schedule_in(KEY_REPEAT_MS, Event::KeyRepeat);
        scheduler.schedule_in(ROLE_BANNER_MS, Event::DismissRoleBanner);

        Game {
            world,
            ai,
            rng,
            scheduler,
            held: HashSet::new(),
            held_since_ms: 0,
            joystick: Joystick::default(),
            role_banner_visible: true,
            player_pulse_until: 0,
            bot_pulse_until: [0; 8],
        }
    }

    pub fn role(&self) -> Role {
        self.world.role
    }

    pub fn state(&self) -> GameState {
        self.world.state
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn ai(&self) -> Option<&AiImpostor> {
        self.ai.as_ref()
    }

    /// Advances virtual time, firing every event that falls due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.scheduler.now_ms() + elapsed_ms;
        while let Some(event) = self.scheduler.pop_due(until) {
            self.world.now_ms = self.scheduler.now_ms();
            self.handle_event(event);
        }
        self.scheduler.advance_to(until);
        self.world.now_ms = until;
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick => self.tick(),
            Event::TouchPoll => {
                if self.joystick.active {
                    let held = self.joystick.directions();
                    if held.any() {
                        self.step_player(held);
                    }
                }
                self.scheduler.schedule_in(TOUCH_POLL_MS, Event::TouchPoll);
            }
            Event::KeyRepeat => {
                // Held keys keep stepping after the initial press, like keyboard auto-repeat
                let held = self.held_directions();
                if held.any() && self.now_ms() - self.held_since_ms >= KEY_REPEAT_DELAY_MS {
                    self.step_player(held);
                }
                self.scheduler.schedule_in(KEY_REPEAT_MS, Event::KeyRepeat);
            }
            Event::DismissRoleBanner => self.role_banner_visible = false,
            Event::EndPlayerPulse => {
                if self.now_ms() >= self.player_pulse_until {
                    self.world.player.moving = false;
                }
            }
            Event::EndBotPulse(room) => {
                if self.now_ms() >= self.bot_pulse_until[room.index()] {
                    self.world.bot_mut(room).moving = false;
                }
            }
        }
    }

    /// One fixed-rate step: wander, cooldowns, AI impostor, body reports.
    fn tick(&mut self) {
        if self.world.is_over() {
            return;
        }

        for room in movement::wander_bots(&mut self.world, &mut self.rng) {
            self.pulse_bot(room);
        }

        abilities::decay_cooldowns(&mut self.world, TICK_MS);

        if let Some(ai) = self.ai.as_mut() {
            let before = self.world.bot(ai.bot).position;
            ai.update(&mut self.world, &mut self.rng);
            let bot = ai.bot;
            if self.world.bot(bot).position != before {
                self.pulse_bot(bot);
            }
        }

        reporting::check_body_reporting(&mut self.world);

        if !self.world.is_over() {
            self.world.check_all_bots_dead();
        }
        self.scheduler.schedule_in(TICK_MS, Event::Tick);
    }

    fn pulse_bot(&mut self, room: Room) {
        let until = self.now_ms() + MOVE_PULSE_MS;
        self.bot_pulse_until[room.index()] = until;
        self.world.bot_mut(room).moving = true;
        self.scheduler.schedule_in(MOVE_PULSE_MS, Event::EndBotPulse(room));
    }

    fn pulse_player(&mut self) {
        self.player_pulse_until = self.now_ms() + MOVE_PULSE_MS;
        self.world.player.moving = true;
        self.scheduler.schedule_in(MOVE_PULSE_MS, Event::EndPlayerPulse);
    }

    fn step_player(&mut self, held: HeldDirections) -> bool {
        if self.world.state != GameState::Playing {
            return false;
        }
        let moved = movement::move_player(&mut self.world, held);
        if moved {
            self.pulse_player();
        }
        moved
    }

    fn log_rejection(action: &str, result: Result<(), ActionError>) {
        if let Err(e) = result {
            crate::debug_ability!("{} rejected: {}", action, e);
        }
    }

    /// Key press: updates the held set, steps the player, then fires any action.
    pub fn key_down(&mut self, key: Key) {
        if key.is_direction() {
            if !self.held_directions().any() {
                self.held_since_ms = self.now_ms();
            }
            self.held.insert(key);
        }
        self.step_player(self.held_directions());

        match key {
            Key::Kill if self.role() == Role::Impostor => {
                Self::log_rejection("Kill", self.kill().map(|_| ()))
            }
            Key::Vent if self.role() == Role::Impostor => Self::log_rejection("Vent", self.vent()),
            Key::Meeting if self.role() == Role::Crewmate => {
                Self::log_rejection("Meeting", self.call_meeting())
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn held_directions(&self) -> HeldDirections {
        HeldDirections::from_keys(&self.held)
    }

    pub fn touch_start(&mut self) {
        self.joystick.start();
    }

    /// Touch moved to `(delta_x, delta_y)` from the joystick center.
    pub fn touch_move(&mut self, delta_x: f64, delta_y: f64) {
        self.joystick.update(delta_x, delta_y);
    }

    pub fn touch_end(&mut self) {
        self.joystick.end();
    }

    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    pub fn kill(&mut self) -> Result<Room, ActionError> {
        abilities::attempt_kill(&mut self.world)
    }

    pub fn vent(&mut self) -> Result<(), ActionError> {
        abilities::attempt_vent(&mut self.world)
    }

    pub fn choose_vent(&mut self, room: Room) -> Result<Point, ActionError> {
        let destination = abilities::choose_vent(&mut self.world, room)?;
        self.pulse_player();
        Ok(destination)
    }

    pub fn cancel_vent(&mut self) -> Result<(), ActionError> {
        abilities::cancel_vent(&mut self.world)
    }

    pub fn call_meeting(&mut self) -> Result<(), ActionError> {
        abilities::attempt_meeting(&mut self.world)
    }

    pub fn vote(&mut self, room: Room) -> Result<VoteResult, ActionError> {
        abilities::vote(&mut self.world, room)
    }

    pub fn skip_vote(&mut self) -> Result<(), ActionError> {
        abilities::skip_vote(&mut self.world)
    }

    /// Ballot rows while a meeting is open.
    pub fn ballot(&self) -> Option<Vec<BallotEntry>> {
        (self.world.state == GameState::Meeting).then(|| abilities::ballot(&self.world))
    }

    /// Vent destinations while the vent menu is open.
    pub fn vent_menu(&self) -> Option<Vec<Room>> {
        (self.world.state == GameState::Venting).then(abilities::vent_menu)
    }

    /// Role announcement shown at session start.
    pub fn role_announcement(&self) -> Option<Banner> {
        if !self.role_banner_visible {
            return None;
        }
        let message = match self.role() {
            Role::Impostor => "Kill all crewmates to win!",
            Role::Crewmate => "Find and vote out the impostor!",
        };
        Some(Banner {
            title: self.role().to_string(),
            message: message.to_string(),
        })
    }

    pub fn victory_banner(&self) -> Option<Banner> {
        self.world.outcome.map(|outcome| outcome.banner())
    }

    /// Remaining time on the player's main ability, in whole seconds, rounded up.
    pub fn cooldown_text(&self) -> Option<String> {
        let (label, cooldown) = match self.role() {
            Role::Impostor => ("Kill", self.world.cooldowns.kill),
            Role::Crewmate => ("Meeting", self.world.cooldowns.meeting),
        };
        if cooldown.is_ready() {
            return None;
        }
        let seconds = cooldown.remaining_ms().div_ceil(1000);
        Some(format!("{} Cooldown: {}s", label, seconds))
    }

    /// Run the main loop using the provided renderer. Frame time drives the
    /// virtual clock; sub-millisecond remainders carry over between frames.
    pub async fn run(&mut self, renderer: &mut Renderer) -> Result<(), Box<dyn std::error::Error>> {
        info!("Starting main loop...");
        let mut carry_ms = 0.0_f32;

        while !Renderer::window_should_close() {
            renderer.handle_input(self);

            carry_ms += get_frame_time() * 1000.0;
            let whole_ms = carry_ms.floor();
            carry_ms -= whole_ms;
            self.advance(whole_ms as u64);

            renderer.draw_frame(self);
            next_frame().await;
        }
        info!("Exiting crew simulation.");
        Ok(())
    }

    pub fn control_instructions(touch: bool) -> &'static str {
        if touch {
            "Use on-screen joystick and buttons to play"
        } else {
            "Use WASD or Arrow Keys to move"
        }
    }
}
