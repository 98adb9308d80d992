use crate::config::{DOOR_WIDTH, ENTITY_SIZE, MAP_HEIGHT, MAP_WIDTH, WALL_THICKNESS};
use crate::types::{Point, Rect, Room};

// Represents the static map: bounds, room floors and wall obstacles
#[derive(Debug, Clone)]
pub struct Map {
    pub width: f64,
    pub height: f64,
    pub obstacles: Vec<Rect>, // Room outline walls
}

impl Map {
    pub fn new() -> Self {
        let mut obstacles = Vec::with_capacity(Room::ALL.len() * 5);
        for room in Room::ALL {
            obstacles.extend(room_walls(room));
        }
        log::info!("Map built with {} wall segments", obstacles.len());

        Map {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            obstacles,
        }
    }

    /// Map without any walls, only the outer bounds.
    pub fn open() -> Self {
        Map {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            obstacles: Vec::new(),
        }
    }

    /// Checks whether an entity whose top-left corner sits at `position` may occupy it.
    /// Role-agnostic: the player and every bot share the same bounding square.
    pub fn is_valid_position(&self, position: Point) -> bool {
        if position.x < 0.0
            || position.y < 0.0
            || position.x + ENTITY_SIZE > self.width
            || position.y + ENTITY_SIZE > self.height
        {
            return false;
        }

        let bounds = Rect::new(position.x, position.y, ENTITY_SIZE, ENTITY_SIZE);
        !self.obstacles.iter().any(|wall| bounds.intersects(wall))
    }

    pub fn room_center(&self, room: Room) -> Point {
        room.bounds().center()
    }

    /// Room whose floor contains the point, if any.
    pub fn room_at(&self, point: Point) -> Option<Room> {
        Room::ALL
            .into_iter()
            .find(|room| room.bounds().contains(point))
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

// Four outline walls of a room, with a doorway cut into the wall facing the corridor
fn room_walls(room: Room) -> Vec<Rect> {
    let r = room.bounds();
    let t = WALL_THICKNESS;
    let top = r.y;
    let bottom = r.y + r.height - t;

    let mut walls = vec![
        Rect::new(r.x, r.y, t, r.height), // Left
        Rect::new(r.x + r.width - t, r.y, t, r.height), // Right
    ];

    let (solid_y, door_y) = if room.is_upper() {
        (top, bottom)
    } else {
        (bottom, top)
    };
    walls.push(Rect::new(r.x, solid_y, r.width, t));

    let side = (r.width - DOOR_WIDTH) / 2.0;
    walls.push(Rect::new(r.x, door_y, side, t));
    walls.push(Rect::new(r.x + side + DOOR_WIDTH, door_y, side, t));
    walls
}
