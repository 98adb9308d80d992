//! The player's timed abilities and the meeting/vent sub-flows.
//!
//! State machine: `Playing <-> Meeting`, `Playing <-> Venting`, anything
//! `-> GameOver` (absorbing). Rejections return an [`ActionError`] and leave
//! the world untouched.

use crate::config::KILL_RANGE;
use crate::error::ActionError;
use crate::types::{GameState, Outcome, Point, Role, Room};
use crate::world::{Cooldown, World};
use log::info;

/// One row of the meeting ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallotEntry {
    pub room: Room,
    pub color: &'static str,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteResult {
    ImpostorEjected,
    InnocentEjected,
}

fn require_role(world: &World, role: Role) -> Result<(), ActionError> {
    if world.role != role {
        return Err(ActionError::WrongRole);
    }
    Ok(())
}

fn require_state(world: &World, state: GameState) -> Result<(), ActionError> {
    if world.state != state {
        return Err(ActionError::WrongState);
    }
    Ok(())
}

fn require_ready(cooldown: &Cooldown) -> Result<(), ActionError> {
    if !cooldown.is_ready() {
        return Err(ActionError::OnCooldown {
            remaining_ms: cooldown.remaining_ms(),
        });
    }
    Ok(())
}

/// Decays every ability cooldown by one tick's worth of time.
pub fn decay_cooldowns(world: &mut World, elapsed_ms: u64) {
    world.cooldowns.kill.tick(elapsed_ms);
    world.cooldowns.vent.tick(elapsed_ms);
    world.cooldowns.meeting.tick(elapsed_ms);
}

/// Nearest alive bot strictly within `range` of `from`.
pub fn nearest_alive_bot(world: &World, from: Point, range: f64) -> Option<Room> {
    world
        .bots
        .iter()
        .filter(|bot| bot.is_alive())
        .map(|bot| (bot.room, from.distance(&bot.position)))
        .filter(|(_, distance)| *distance < range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(room, _)| room)
}

/// Impostor kill on the nearest alive bot within kill range.
pub fn attempt_kill(world: &mut World) -> Result<Room, ActionError> {
    require_role(world, Role::Impostor)?;
    require_state(world, GameState::Playing)?;
    require_ready(&world.cooldowns.kill)?;

    let target = nearest_alive_bot(world, world.player.position, KILL_RANGE)
        .ok_or(ActionError::NoTargetInRange)?;

    world.kill_bot(target, true);
    world.cooldowns.kill.arm();
    world.record_kill();
    Ok(target)
}

/// Opens the vent menu.
pub fn attempt_vent(world: &mut World) -> Result<(), ActionError> {
    require_role(world, Role::Impostor)?;
    require_state(world, GameState::Playing)?;
    require_ready(&world.cooldowns.vent)?;

    world.state = GameState::Venting;
    Ok(())
}

/// Rooms offered by the vent menu.
pub fn vent_menu() -> Vec<Room> {
    Room::ALL.to_vec()
}

/// Teleports the player to the chosen room's center and closes the menu.
pub fn choose_vent(world: &mut World, room: Room) -> Result<Point, ActionError> {
    require_state(world, GameState::Venting)?;

    let destination = world.map.room_center(room);
    world.player.position = destination;
    world.player.moving = true;
    world.cooldowns.vent.arm();
    world.state = GameState::Playing;
    info!("Player vented to {}", room);
    Ok(destination)
}

/// Closes the vent menu without cost.
pub fn cancel_vent(world: &mut World) -> Result<(), ActionError> {
    require_state(world, GameState::Venting)?;
    world.state = GameState::Playing;
    Ok(())
}

/// Calls an emergency meeting from inside the cafeteria.
pub fn attempt_meeting(world: &mut World) -> Result<(), ActionError> {
    require_role(world, Role::Crewmate)?;
    require_state(world, GameState::Playing)?;
    if !Room::Cafeteria.bounds().contains(world.player.position) {
        return Err(ActionError::OutsideCafeteria);
    }
    require_ready(&world.cooldowns.meeting)?;

    world.state = GameState::Meeting;
    world.cooldowns.meeting.arm();
    info!("Emergency meeting called");
    Ok(())
}

/// Every bot with its alive flag, in room order.
pub fn ballot(world: &World) -> Vec<BallotEntry> {
    world
        .bots
        .iter()
        .map(|bot| BallotEntry {
            room: bot.room,
            color: bot.room.bot_color(),
            alive: bot.is_alive(),
        })
        .collect()
}

/// Ejects the selected bot and closes the meeting.
pub fn vote(world: &mut World, room: Room) -> Result<VoteResult, ActionError> {
    require_state(world, GameState::Meeting)?;
    if !world.bot(room).is_alive() {
        return Err(ActionError::BotAlreadyDead);
    }

    // Ejected bots leave no body behind
    world.kill_bot(room, false);

    let result = if world.impostor_bot == Some(room) {
        world.impostor_disabled = true;
        world.declare_victory(Outcome::ImpostorVotedOut);
        VoteResult::ImpostorEjected
    } else {
        info!("Wrong vote! {} was not the impostor", room);
        VoteResult::InnocentEjected
    };
    end_meeting(world);
    Ok(result)
}

/// Closes the meeting without ejecting anyone.
pub fn skip_vote(world: &mut World) -> Result<(), ActionError> {
    require_state(world, GameState::Meeting)?;
    end_meeting(world);
    Ok(())
}

fn end_meeting(world: &mut World) {
    if !world.is_over() {
        world.state = GameState::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KILL_COOLDOWN_MS, MEETING_COOLDOWN_MS, TICK_MS, VENT_COOLDOWN_MS};
    use crate::map::Map;
    use crate::types::LifeState;
    use assert_approx_eq::assert_approx_eq;

    fn impostor_world() -> World {
        World::new(Map::open(), Role::Impostor)
    }

    fn crew_world() -> World {
        World::new(Map::open(), Role::Crewmate)
    }

    fn place(world: &mut World, room: Room, position: Point) {
        world.bot_mut(room).position = position;
    }

    #[test]
    fn test_kill_picks_nearest_in_range() {
        let mut world = impostor_world();
        world.player.position = Point::new(500.0, 200.0);
        // Cafeteria comes first in iteration order but is further away
        place(&mut world, Room::Cafeteria, Point::new(525.0, 200.0));
        place(&mut world, Room::Navigation, Point::new(510.0, 200.0));

        assert_eq!(attempt_kill(&mut world), Ok(Room::Navigation));
        assert_eq!(world.bot(Room::Navigation).life, LifeState::Dead);
        assert_eq!(world.bot(Room::Cafeteria).life, LifeState::Alive);
        assert_eq!(world.bodies.len(), 1);
        assert_eq!(world.bodies[0].room, Room::Navigation);
        assert_eq!(world.cooldowns.kill.remaining_ms(), KILL_COOLDOWN_MS);
        assert_eq!(world.player_kills, 1);
    }

    #[test]
    fn test_kill_out_of_range_is_noop() {
        let mut world = impostor_world();
        world.player.position = Point::new(500.0, 20.0);
        assert_eq!(attempt_kill(&mut world), Err(ActionError::NoTargetInRange));
        assert!(world.bodies.is_empty());
        assert!(world.cooldowns.kill.is_ready());
    }

    #[test]
    fn test_kill_cooldown_rearms_after_exactly_eight_seconds() {
        let mut world = impostor_world();
        world.player.position = Point::new(500.0, 200.0);
        place(&mut world, Room::Admin, Point::new(505.0, 200.0));
        place(&mut world, Room::Weapons, Point::new(495.0, 205.0));

        attempt_kill(&mut world).unwrap();
        let ticks = KILL_COOLDOWN_MS / TICK_MS;
        for _ in 0..ticks - 1 {
            decay_cooldowns(&mut world, TICK_MS);
            assert!(matches!(
                attempt_kill(&mut world),
                Err(ActionError::OnCooldown { .. })
            ));
        }
        decay_cooldowns(&mut world, TICK_MS);
        assert!(attempt_kill(&mut world).is_ok());
        assert_eq!(world.player_kills, 2);
    }

    #[test]
    fn test_crewmate_cannot_kill_or_vent() {
        let mut world = crew_world();
        assert_eq!(attempt_kill(&mut world), Err(ActionError::WrongRole));
        assert_eq!(attempt_vent(&mut world), Err(ActionError::WrongRole));
        assert_eq!(world.state, GameState::Playing);
    }

    #[test]
    fn test_seventh_kill_ends_game_and_blocks_further_kills() {
        let mut world = impostor_world();
        world.player.position = Point::new(500.0, 200.0);
        for room in Room::ALL.iter().take(7) {
            place(&mut world, *room, Point::new(505.0, 200.0));
            world.cooldowns.kill = Cooldown::new(KILL_COOLDOWN_MS);
            attempt_kill(&mut world).unwrap();
        }
        assert_eq!(world.state, GameState::GameOver);
        assert_eq!(world.outcome, Some(Outcome::ImpostorKills));

        place(&mut world, Room::Navigation, Point::new(505.0, 200.0));
        world.cooldowns.kill = Cooldown::new(KILL_COOLDOWN_MS);
        assert_eq!(attempt_kill(&mut world), Err(ActionError::WrongState));
        assert!(world.bot(Room::Navigation).is_alive());
    }

    #[test]
    fn test_vent_flow() {
        let mut world = impostor_world();
        attempt_vent(&mut world).unwrap();
        assert_eq!(world.state, GameState::Venting);
        assert_eq!(vent_menu().len(), 8);

        // Abilities are locked while the menu is open
        assert_eq!(attempt_kill(&mut world), Err(ActionError::WrongState));

        let destination = choose_vent(&mut world, Room::Navigation).unwrap();
        assert_approx_eq!(destination.x, 860.0);
        assert_approx_eq!(destination.y, 310.0);
        assert_eq!(world.player.position, destination);
        assert_eq!(world.state, GameState::Playing);
        assert_eq!(world.cooldowns.vent.remaining_ms(), VENT_COOLDOWN_MS);
        assert!(matches!(
            attempt_vent(&mut world),
            Err(ActionError::OnCooldown { .. })
        ));
    }

    #[test]
    fn test_vent_cancel_is_free() {
        let mut world = impostor_world();
        let before = world.player.position;
        attempt_vent(&mut world).unwrap();
        cancel_vent(&mut world).unwrap();
        assert_eq!(world.state, GameState::Playing);
        assert_eq!(world.player.position, before);
        assert!(world.cooldowns.vent.is_ready());
        assert_eq!(cancel_vent(&mut world), Err(ActionError::WrongState));
    }

    #[test]
    fn test_meeting_requires_cafeteria() {
        let mut world = crew_world();
        world.player.position = Point::new(400.0, 300.0);
        assert_eq!(
            attempt_meeting(&mut world),
            Err(ActionError::OutsideCafeteria)
        );
        assert_eq!(world.state, GameState::Playing);

        world.player.position = Point::new(100.0, 100.0);
        attempt_meeting(&mut world).unwrap();
        assert_eq!(world.state, GameState::Meeting);
        assert_eq!(world.cooldowns.meeting.remaining_ms(), MEETING_COOLDOWN_MS);

        skip_vote(&mut world).unwrap();
        assert_eq!(world.state, GameState::Playing);
        assert!(matches!(
            attempt_meeting(&mut world),
            Err(ActionError::OnCooldown { .. })
        ));
    }

    #[test]
    fn test_impostor_cannot_call_meeting() {
        let mut world = impostor_world();
        world.player.position = Point::new(100.0, 100.0);
        assert_eq!(attempt_meeting(&mut world), Err(ActionError::WrongRole));
    }

    #[test]
    fn test_ballot_lists_all_bots_and_blocks_dead() {
        let mut world = crew_world();
        world.impostor_bot = Some(Room::Security);
        for room in [Room::Medbay, Room::Storage, Room::Weapons] {
            world.kill_bot(room, false);
        }
        attempt_meeting(&mut world).unwrap();

        let entries = ballot(&world);
        assert_eq!(entries.len(), 8);
        assert_eq!(entries.iter().filter(|e| e.alive).count(), 5);
        assert!(!entries[Room::Medbay.index()].alive);
        assert_eq!(entries[Room::Medbay.index()].color, "Green");

        assert_eq!(
            vote(&mut world, Room::Storage),
            Err(ActionError::BotAlreadyDead)
        );
        assert_eq!(world.state, GameState::Meeting);
        assert_eq!(world.alive_bot_count(), 5);
    }

    #[test]
    fn test_wrong_vote_resumes() {
        let mut world = crew_world();
        world.impostor_bot = Some(Room::Security);
        attempt_meeting(&mut world).unwrap();
        assert_eq!(
            vote(&mut world, Room::Admin),
            Ok(VoteResult::InnocentEjected)
        );
        assert_eq!(world.state, GameState::Playing);
        assert!(!world.bot(Room::Admin).is_alive());
        assert!(world.bodies.is_empty());
        assert!(!world.impostor_disabled);
    }

    #[test]
    fn test_voting_out_impostor_wins() {
        let mut world = crew_world();
        world.impostor_bot = Some(Room::Security);
        attempt_meeting(&mut world).unwrap();
        assert_eq!(
            vote(&mut world, Room::Security),
            Ok(VoteResult::ImpostorEjected)
        );
        assert!(world.impostor_disabled);
        assert_eq!(world.state, GameState::GameOver);
        assert_eq!(world.outcome, Some(Outcome::ImpostorVotedOut));
    }

    #[test]
    fn test_vote_outside_meeting_rejected() {
        let mut world = crew_world();
        assert_eq!(vote(&mut world, Room::Admin), Err(ActionError::WrongState));
        assert!(world.bot(Room::Admin).is_alive());
    }
}
