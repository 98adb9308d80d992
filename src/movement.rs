//! Player stepping and bot wandering. Every step is validated against the map
//! before it is committed; rejected steps leave the position untouched.

use crate::config::{BOT_SPEED, PLAYER_STEP, WANDER_REDIRECT_PROBABILITY};
use crate::input::HeldDirections;
use crate::types::{Heading, Point, Room};
use crate::world::World;
use rand::Rng;
use rand::seq::SliceRandom;

/// Attempts one player step in the held directions. Returns true if the player moved.
/// There is no sliding: a blocked diagonal step does not fall back to a single axis.
pub fn move_player(world: &mut World, held: HeldDirections) -> bool {
    let (ax, ay) = held.axes();
    if ax == 0.0 && ay == 0.0 {
        return false;
    }
    let current = world.player.position;
    let candidate = Point::new(current.x + ax * PLAYER_STEP, current.y + ay * PLAYER_STEP);

    if world.map.is_valid_position(candidate) {
        world.player.position = candidate;
        world.player.moving = true;
        true
    } else {
        crate::debug_move!(
            "Player blocked at ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            current.x,
            current.y,
            candidate.x,
            candidate.y
        );
        false
    }
}

/// Advances one bot by one tick of wandering. Returns true if it moved.
pub fn wander_bot<R: Rng + ?Sized>(world: &mut World, room: Room, rng: &mut R) -> bool {
    if !world.bot(room).is_alive() {
        return false;
    }

    if rng.gen_bool(WANDER_REDIRECT_PROBABILITY) {
        if let Some(heading) = Heading::PALETTE.choose(rng) {
            world.bot_mut(room).heading = *heading;
        }
    }

    let bot = world.bot(room);
    let candidate = Point::new(
        bot.position.x + bot.heading.dx * BOT_SPEED,
        bot.position.y + bot.heading.dy * BOT_SPEED,
    );

    if world.map.is_valid_position(candidate) {
        let bot = world.bot_mut(room);
        bot.position = candidate;
        bot.moving = true;
        true
    } else {
        // Turn away instead of stopping
        let bounces = bot.heading.bounces();
        if let Some(bounce) = bounces.choose(rng) {
            crate::debug_move!(
                "{} bot bounced ({:.2}, {:.2}) -> ({:.2}, {:.2})",
                room,
                bot.heading.dx,
                bot.heading.dy,
                bounce.dx,
                bounce.dy
            );
            world.bot_mut(room).heading = *bounce;
        }
        false
    }
}

/// Wanders every alive bot once, in room order. Returns the bots that moved.
pub fn wander_bots<R: Rng + ?Sized>(world: &mut World, rng: &mut R) -> Vec<Room> {
    Room::ALL
        .into_iter()
        .filter(|room| wander_bot(world, *room, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;
    use crate::types::{LifeState, Rect, Role};
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world() -> World {
        World::new(Map::new(), Role::Crewmate)
    }

    #[test]
    fn test_player_diagonal_step() {
        let mut world = world();
        let start = world.player.position;
        let held = HeldDirections {
            down: true,
            right: true,
            ..Default::default()
        };
        assert!(move_player(&mut world, held));
        assert_approx_eq!(world.player.position.x, start.x + PLAYER_STEP);
        assert_approx_eq!(world.player.position.y, start.y + PLAYER_STEP);
        assert!(world.player.moving);
    }

    #[test]
    fn test_rejected_step_leaves_position_unchanged() {
        let mut world = world();
        // Park the player right under the cafeteria's top wall
        world.player.position = Point::new(100.0, 56.0);
        let before = world.player.position;
        let held = HeldDirections {
            up: true,
            left: true,
            ..Default::default()
        };
        assert!(!move_player(&mut world, held));
        assert_eq!(world.player.position, before);
        assert!(!world.player.moving);
    }

    #[test]
    fn test_no_input_no_move() {
        let mut world = world();
        let before = world.player.position;
        assert!(!move_player(&mut world, HeldDirections::default()));
        assert_eq!(world.player.position, before);
    }

    #[test]
    fn test_dead_bots_never_move() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(7);
        world.kill_bot(Room::Weapons, true);
        let before = world.bot(Room::Weapons).position;
        for _ in 0..200 {
            wander_bots(&mut world, &mut rng);
        }
        let bot = world.bot(Room::Weapons);
        assert_eq!(bot.position, before);
        assert_eq!(bot.life, LifeState::Dead);
        assert!(bot.heading.is_zero());
    }

    #[test]
    fn test_bots_stay_in_valid_positions() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2_000 {
            wander_bots(&mut world, &mut rng);
            for bot in &world.bots {
                assert!(world.map.is_valid_position(bot.position));
            }
        }
    }

    #[test]
    fn test_blocked_bot_changes_heading() {
        let mut world = world();
        // A wall directly to the east of the admin bot
        let bot_pos = world.bot(Room::Admin).position;
        world.map.obstacles.push(Rect::new(bot_pos.x + 21.0, bot_pos.y - 50.0, 4.0, 100.0));
        world.bot_mut(Room::Admin).heading = Heading::EAST;

        let mut rng = StdRng::seed_from_u64(3);
        let mut turned = false;
        for _ in 0..50 {
            wander_bot(&mut world, Room::Admin, &mut rng);
            if world.bot(Room::Admin).heading != Heading::EAST {
                turned = true;
                break;
            }
        }
        assert!(turned, "bot kept pushing into the wall");
        assert!(world.map.is_valid_position(world.bot(Room::Admin).position));
    }
}
