//! Dead-body discovery. The first body found ends the round for the crew.

use crate::config::{BOT_REPORT_RADIUS, PLAYER_REPORT_RADIUS};
use crate::types::{Outcome, Reporter};
use crate::world::World;

/// Scans unreported bodies against the player and every alive, non-impostor bot.
/// Each body is reported at most once. Returns the body index and who found it.
pub fn check_body_reporting(world: &mut World) -> Option<(usize, Reporter)> {
    if world.is_over() {
        return None;
    }

    let found = world
        .bodies
        .iter()
        .enumerate()
        .filter(|(index, _)| !world.reported.contains(index))
        .find_map(|(index, body)| {
            // Stepping onto any body counts, even the player impostor's own victim
            if world.player.position.distance(&body.position) < PLAYER_REPORT_RADIUS {
                return Some((index, Reporter::Player(world.role)));
            }
            world
                .bots
                .iter()
                .filter(|bot| bot.is_alive() && Some(bot.room) != world.impostor_bot)
                .find(|bot| bot.position.distance(&body.position) < BOT_REPORT_RADIUS)
                .map(|bot| (index, Reporter::Bot(bot.room)))
        });

    let (index, reporter) = found?;
    world.reported.insert(index);
    crate::debug_report!(
        "Body #{} ({}) reported by {:?}",
        index,
        world.bodies[index].room,
        reporter
    );
    world.declare_victory(Outcome::BodyReported(reporter));
    Some((index, reporter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;
    use crate::types::{GameState, Point, Role, Room};

    #[test]
    fn test_player_stumbles_onto_body() {
        let mut world = World::new(Map::open(), Role::Crewmate);
        world.impostor_bot = Some(Room::Medbay);
        world.kill_bot(Room::Admin, true);
        let body = world.bodies[0].position;

        world.player.position = Point::new(body.x + 6.0, body.y);
        assert_eq!(check_body_reporting(&mut world), None);

        world.player.position = Point::new(body.x + 4.0, body.y);
        assert_eq!(
            check_body_reporting(&mut world),
            Some((0, Reporter::Player(Role::Crewmate)))
        );
        assert_eq!(world.state, GameState::GameOver);
        assert!(world.outcome.unwrap().crew_won());
    }

    #[test]
    fn test_impostor_finding_own_victim_loses() {
        let mut world = World::new(Map::open(), Role::Impostor);
        world.kill_bot(Room::Storage, true);
        world.player.position = world.bodies[0].position;
        check_body_reporting(&mut world);
        assert_eq!(
            world.outcome,
            Some(Outcome::BodyReported(Reporter::Player(Role::Impostor)))
        );
        let banner = world.outcome.unwrap().banner();
        assert_eq!(banner.message, "Your victim was found!");
    }

    #[test]
    fn test_bot_reports_but_impostor_bot_does_not() {
        let mut world = World::new(Map::open(), Role::Crewmate);
        world.impostor_bot = Some(Room::Medbay);
        world.kill_bot(Room::Admin, true);
        let body = world.bodies[0].position;

        // The impostor standing on its own kill says nothing
        world.bot_mut(Room::Medbay).position = body;
        assert_eq!(check_body_reporting(&mut world), None);

        world.bot_mut(Room::Weapons).position = Point::new(body.x, body.y + 9.0);
        assert_eq!(
            check_body_reporting(&mut world),
            Some((0, Reporter::Bot(Room::Weapons)))
        );
        assert_eq!(
            world.outcome.unwrap().banner().message,
            "AI crewmate reported a dead body!"
        );
    }

    #[test]
    fn test_body_reported_once() {
        let mut world = World::new(Map::open(), Role::Crewmate);
        world.kill_bot(Room::Admin, true);
        world.player.position = world.bodies[0].position;
        assert!(check_body_reporting(&mut world).is_some());

        // Revisiting the body never re-declares anything
        world.state = GameState::Playing;
        world.outcome = None;
        assert_eq!(check_body_reporting(&mut world), None);
        assert_eq!(world.reported.len(), 1);
        assert_eq!(world.outcome, None);
    }

    #[test]
    fn test_dead_bots_do_not_report() {
        let mut world = World::new(Map::open(), Role::Crewmate);
        world.kill_bot(Room::Admin, true);
        world.kill_bot(Room::Weapons, false);
        world.bot_mut(Room::Weapons).position = world.bodies[0].position;
        assert_eq!(check_body_reporting(&mut world), None);
        assert_eq!(world.state, GameState::Playing);
    }
}
