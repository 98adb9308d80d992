use crate::config::DIAGONAL_COMPONENT;
use crate::error::{ParseRoleError, ParseRoomError};
use std::fmt;
use std::str::FromStr;

// A position in map pixels (top-left corner of an entity's bounding square)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Inclusive containment test for a single point.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Strict overlap: rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Direction vector of a wandering bot. Either zero or (approximately) unit length.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Heading {
    pub dx: f64,
    pub dy: f64,
}

impl Heading {
    pub const ZERO: Heading = Heading { dx: 0.0, dy: 0.0 };
    pub const EAST: Heading = Heading { dx: 1.0, dy: 0.0 };

    /// The 8 directions a bot may pick when it changes course.
    pub const PALETTE: [Heading; 8] = [
        Heading { dx: 1.0, dy: 0.0 },
        Heading { dx: -1.0, dy: 0.0 },
        Heading { dx: 0.0, dy: 1.0 },
        Heading { dx: 0.0, dy: -1.0 },
        Heading { dx: DIAGONAL_COMPONENT, dy: DIAGONAL_COMPONENT },
        Heading { dx: -DIAGONAL_COMPONENT, dy: DIAGONAL_COMPONENT },
        Heading { dx: DIAGONAL_COMPONENT, dy: -DIAGONAL_COMPONENT },
        Heading { dx: -DIAGONAL_COMPONENT, dy: -DIAGONAL_COMPONENT },
    ];

    pub fn new(dx: f64, dy: f64) -> Self {
        Heading { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Candidate headings after running into a wall.
    pub fn bounces(&self) -> [Heading; 5] {
        let Heading { dx, dy } = *self;
        [
            Heading::new(-dx, dy),  // Reverse X
            Heading::new(dx, -dy),  // Reverse Y
            Heading::new(-dx, -dy), // Reverse both
            Heading::new(dy, dx),   // Rotate 90 degrees
            Heading::new(-dy, -dx), // Rotate -90 degrees
        ]
    }
}

// The 8 rooms of the map. Each room also owns exactly one bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Room {
    Cafeteria,
    Medbay,
    Security,
    Electrical,
    Storage,
    Admin,
    Weapons,
    Navigation,
}

impl Room {
    pub const ALL: [Room; 8] = [
        Room::Cafeteria,
        Room::Medbay,
        Room::Security,
        Room::Electrical,
        Room::Storage,
        Room::Admin,
        Room::Weapons,
        Room::Navigation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Static floor rectangle of the room.
    pub fn bounds(self) -> Rect {
        match self {
            Room::Cafeteria => Rect::new(50.0, 50.0, 200.0, 150.0),
            Room::Medbay => Rect::new(300.0, 50.0, 180.0, 140.0),
            Room::Security => Rect::new(530.0, 50.0, 160.0, 120.0),
            Room::Electrical => Rect::new(740.0, 50.0, 170.0, 130.0),
            Room::Storage => Rect::new(50.0, 250.0, 190.0, 160.0),
            Room::Admin => Rect::new(300.0, 250.0, 200.0, 150.0),
            Room::Weapons => Rect::new(550.0, 250.0, 180.0, 140.0),
            Room::Navigation => Rect::new(780.0, 250.0, 160.0, 120.0),
        }
    }

    /// True for rooms in the top row, whose doorway faces down into the corridor.
    pub fn is_upper(self) -> bool {
        matches!(
            self,
            Room::Cafeteria | Room::Medbay | Room::Security | Room::Electrical
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Room::Cafeteria => "Cafeteria",
            Room::Medbay => "MedBay",
            Room::Security => "Security",
            Room::Electrical => "Electrical",
            Room::Storage => "Storage",
            Room::Admin => "Admin",
            Room::Weapons => "Weapons",
            Room::Navigation => "Navigation",
        }
    }

    /// Display color of the bot that lives in this room.
    pub fn bot_color(self) -> &'static str {
        match self {
            Room::Cafeteria => "Blue",
            Room::Medbay => "Green",
            Room::Security => "Orange",
            Room::Electrical => "Purple",
            Room::Storage => "Turquoise",
            Room::Admin => "Pink",
            Room::Weapons => "Blue Grey",
            Room::Navigation => "Brown",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Room {
    type Err = ParseRoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Room::ALL
            .into_iter()
            .find(|room| room.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRoomError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Crewmate,
    Impostor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Crewmate => f.write_str("CREWMATE"),
            Role::Impostor => f.write_str("IMPOSTOR"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crewmate" | "crew" => Ok(Role::Crewmate),
            "impostor" | "imposter" => Ok(Role::Impostor),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

// Process-wide game phase; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Meeting,
    Venting,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadBody {
    pub room: Room,
    pub position: Point,
    pub time_of_death_ms: u64,
}

/// Who stumbled onto a dead body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporter {
    Player(Role),
    Bot(Room),
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    ImpostorKills,
    TotalElimination,
    AiImpostorWins,
    ImpostorVotedOut,
    BodyReported(Reporter),
}

impl Outcome {
    pub fn banner(&self) -> Banner {
        let (title, message) = match self {
            Outcome::ImpostorKills => ("Impostor Wins!", "You eliminated 7 crewmates!"),
            Outcome::TotalElimination => ("VICTORY!", "You eliminated all bots!"),
            Outcome::AiImpostorWins => (
                "AI Impostor Wins!",
                "All crewmates have been eliminated!",
            ),
            Outcome::ImpostorVotedOut => ("Crewmates Win!", "You voted out the impostor!"),
            Outcome::BodyReported(Reporter::Player(Role::Crewmate)) => {
                ("Crewmates Win!", "Dead body was reported!")
            }
            Outcome::BodyReported(Reporter::Player(Role::Impostor)) => {
                ("Crewmates Win!", "Your victim was found!")
            }
            Outcome::BodyReported(Reporter::Bot(_)) => {
                ("Crewmates Win!", "AI crewmate reported a dead body!")
            }
        };
        Banner {
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn crew_won(&self) -> bool {
        matches!(
            self,
            Outcome::ImpostorVotedOut | Outcome::BodyReported(_)
        )
    }
}

/// Title and message pair for the role announcement and the victory overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub message: String,
}
