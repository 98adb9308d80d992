use crate::config::{
    ENTITY_SIZE, HUD_HEIGHT, JOYSTICK_RADIUS, MAP_HEIGHT, MAP_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::game::Game;
use crate::input::Key;
use crate::types::{Banner, GameState, Role, Room};
use crate::world::Bot;
use macroquad::prelude::*;

const MENU_WIDTH: f32 = 420.0;
const MENU_ROW_HEIGHT: f32 = 34.0;
const MENU_HEADER_HEIGHT: f32 = 70.0;
const BUTTON_WIDTH: f32 = 110.0;
const BUTTON_HEIGHT: f32 = 44.0;
const JOYSTICK_CENTER: (f32, f32) = (70.0, MAP_HEIGHT as f32 + HUD_HEIGHT as f32 / 2.0);

// Scales a color's alpha
fn faded_color(mut color: Color, alpha: f32) -> Color {
    color.a *= alpha;
    color
}

fn brighten_color(color: Color, amount: f32) -> Color {
    Color::new(
        (color.r + amount).min(1.0),
        (color.g + amount).min(1.0),
        (color.b + amount).min(1.0),
        color.a,
    )
}

/// Screen color for the bot living in `room`.
pub fn bot_color(room: Room) -> Color {
    match room {
        Room::Cafeteria => Color::from_rgba(33, 150, 243, 255),
        Room::Medbay => Color::from_rgba(76, 175, 80, 255),
        Room::Security => Color::from_rgba(255, 152, 0, 255),
        Room::Electrical => Color::from_rgba(156, 39, 176, 255),
        Room::Storage => Color::from_rgba(0, 188, 212, 255),
        Room::Admin => Color::from_rgba(233, 30, 99, 255),
        Room::Weapons => Color::from_rgba(96, 125, 139, 255),
        Room::Navigation => Color::from_rgba(121, 85, 72, 255),
    }
}

/// Maps a physical key to a game key. Menu digits are handled separately.
pub fn key_for(code: KeyCode) -> Option<Key> {
    Key::from_name(&format!("{:?}", code).to_lowercase())
}

// Digit keys pick menu rows; 0 is skip/cancel
fn menu_digit(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Key1 => Some(0),
        KeyCode::Key2 => Some(1),
        KeyCode::Key3 => Some(2),
        KeyCode::Key4 => Some(3),
        KeyCode::Key5 => Some(4),
        KeyCode::Key6 => Some(5),
        KeyCode::Key7 => Some(6),
        KeyCode::Key8 => Some(7),
        KeyCode::Key0 => Some(8),
        _ => None,
    }
}

// Top-left corner of a centered menu with `rows` selectable rows
fn menu_origin(rows: usize) -> (f32, f32) {
    let height = MENU_HEADER_HEIGHT + rows as f32 * MENU_ROW_HEIGHT + 10.0;
    (
        (WINDOW_WIDTH as f32 - MENU_WIDTH) / 2.0,
        ((MAP_HEIGHT as f32 - height) / 2.0).max(4.0),
    )
}

/// Row of a centered menu under the point, if any.
pub fn menu_row_at(x: f32, y: f32, rows: usize) -> Option<usize> {
    let (left, top) = menu_origin(rows);
    let first = top + MENU_HEADER_HEIGHT;
    if x < left || x > left + MENU_WIDTH || y < first {
        return None;
    }
    let row = ((y - first) / MENU_ROW_HEIGHT) as usize;
    (row < rows).then_some(row)
}

// HUD action buttons, right-aligned
fn button_origin(slot: usize) -> (f32, f32) {
    let x = WINDOW_WIDTH as f32 - (slot as f32 + 1.0) * (BUTTON_WIDTH + 12.0);
    let y = MAP_HEIGHT as f32 + (HUD_HEIGHT as f32 - BUTTON_HEIGHT) / 2.0;
    (x, y)
}

/// Action button under the point, if any.
pub fn button_at(x: f32, y: f32, slots: usize) -> Option<usize> {
    (0..slots).find(|&slot| {
        let (bx, by) = button_origin(slot);
        x >= bx && x <= bx + BUTTON_WIDTH && y >= by && y <= by + BUTTON_HEIGHT
    })
}

fn action_buttons(role: Role) -> &'static [&'static str] {
    match role {
        Role::Impostor => &["KILL", "VENT"],
        Role::Crewmate => &["MEETING"],
    }
}

// Handles input and rendering of the session using macroquad
pub struct Renderer {
    touch_mode: bool,
    joystick_touch: Option<u64>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            touch_mode: false,
            joystick_touch: None,
        }
    }

    /// Feeds this frame's keyboard, mouse and touch input into the game.
    pub fn handle_input(&mut self, game: &mut Game) {
        for code in get_keys_pressed() {
            if let Some(key) = key_for(code) {
                game.key_down(key);
            } else if let Some(row) = menu_digit(code) {
                Self::choose_row(game, row);
            }
        }
        for code in get_keys_released() {
            if let Some(key) = key_for(code) {
                game.key_up(key);
            }
        }

        for touch in touches() {
            self.touch_mode = true;
            let dx = (touch.position.x - JOYSTICK_CENTER.0) as f64;
            let dy = (touch.position.y - JOYSTICK_CENTER.1) as f64;
            match touch.phase {
                TouchPhase::Started => {
                    if self.joystick_touch.is_none() && dx.hypot(dy) <= JOYSTICK_RADIUS * 1.5 {
                        self.joystick_touch = Some(touch.id);
                        game.touch_start();
                        game.touch_move(dx, dy);
                    }
                }
                TouchPhase::Moved | TouchPhase::Stationary => {
                    if self.joystick_touch == Some(touch.id) {
                        game.touch_move(dx, dy);
                    }
                }
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    if self.joystick_touch == Some(touch.id) {
                        self.joystick_touch = None;
                        game.touch_end();
                    }
                }
            }
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            self.click(game, x, y);
        }
    }

    fn click(&mut self, game: &mut Game, x: f32, y: f32) {
        let rows = match game.state() {
            GameState::Meeting => game.ballot().map(|ballot| ballot.len() + 1),
            GameState::Venting => game.vent_menu().map(|rooms| rooms.len() + 1),
            _ => None,
        };
        if let Some(rows) = rows {
            if let Some(row) = menu_row_at(x, y, rows) {
                Self::choose_row(game, row);
            }
            return;
        }

        let Some(slot) = button_at(x, y, action_buttons(game.role()).len()) else {
            return;
        };
        let result = match (game.role(), slot) {
            (Role::Impostor, 0) => game.kill().map(|_| ()),
            (Role::Impostor, _) => game.vent(),
            (Role::Crewmate, _) => game.call_meeting(),
        };
        if let Err(e) = result {
            crate::debug_ability!("Button {} rejected: {}", slot, e);
        }
    }

    // Picks a row of whichever menu is open; the row past the last entry skips or cancels
    fn choose_row(game: &mut Game, row: usize) {
        let result = match game.state() {
            GameState::Meeting => {
                let ballot = game.ballot().unwrap_or_default();
                match ballot.get(row) {
                    Some(entry) => game.vote(entry.room).map(|_| ()),
                    None => game.skip_vote(),
                }
            }
            GameState::Venting => {
                let rooms = game.vent_menu().unwrap_or_default();
                match rooms.get(row) {
                    Some(&room) => game.choose_vent(room).map(|_| ()),
                    None => game.cancel_vent(),
                }
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            crate::debug_ability!("Menu choice {} rejected: {}", row, e);
        }
    }

    pub fn draw_frame(&self, game: &Game) {
        clear_background(Color::from_rgba(18, 18, 28, 255));

        Self::draw_rooms();
        Self::draw_walls(game);
        Self::draw_bodies(game);
        for bot in &game.world.bots {
            Self::draw_bot(bot);
        }
        Self::draw_player(game);
        self.draw_hud(game);

        if let Some(ballot) = game.ballot() {
            let rows: Vec<(String, Color, bool)> = ballot
                .iter()
                .map(|entry| {
                    let label = if entry.alive {
                        format!("{} ({})", entry.color, entry.room)
                    } else {
                        format!("{} ({}) - dead", entry.color, entry.room)
                    };
                    (label, bot_color(entry.room), entry.alive)
                })
                .collect();
            let subtitle = "Who is the impostor?";
            Self::draw_menu("EMERGENCY MEETING", subtitle, &rows, "Skip vote");
        } else if let Some(rooms) = game.vent_menu() {
            let rows: Vec<(String, Color, bool)> = rooms
                .iter()
                .map(|room| (room.to_string(), LIGHTGRAY, true))
                .collect();
            Self::draw_menu("VENT", "Choose a destination", &rows, "Cancel");
        }

        if let Some(banner) = game.victory_banner() {
            let crew_won = game.world.outcome.is_some_and(|outcome| outcome.crew_won());
            let title_color = if crew_won { SKYBLUE } else { RED };
            Self::draw_announcement(&banner, title_color, Some("Press ESC to exit"));
        } else if let Some(banner) = game.role_announcement() {
            Self::draw_announcement(&banner, GOLD, None);
        }
    }

    fn draw_rooms() {
        let floor = Color::from_rgba(30, 32, 44, 255);
        draw_rectangle(0.0, 0.0, MAP_WIDTH as f32, MAP_HEIGHT as f32, floor);
        for room in Room::ALL {
            let r = room.bounds();
            draw_rectangle(
                r.x as f32,
                r.y as f32,
                r.width as f32,
                r.height as f32,
                Color::from_rgba(52, 56, 74, 255),
            );
            let (label_x, label_y) = (r.x as f32 + 8.0, r.y as f32 + 20.0);
            draw_text(room.name(), label_x, label_y, 18.0, faded_color(WHITE, 0.6));
        }
    }

    fn draw_walls(game: &Game) {
        for wall in &game.world.map.obstacles {
            draw_rectangle(
                wall.x as f32,
                wall.y as f32,
                wall.width as f32,
                wall.height as f32,
                Color::from_rgba(140, 146, 170, 255),
            );
        }
    }

    fn draw_bodies(game: &Game) {
        let size = ENTITY_SIZE as f32;
        for body in &game.world.bodies {
            let (x, y) = (body.position.x as f32, body.position.y as f32);
            let color = faded_color(bot_color(body.room), 0.5);
            draw_rectangle(x, y + size / 2.0, size, size / 2.0, color);
            draw_line(x + 4.0, y + 4.0, x + size - 4.0, y + size - 4.0, 2.0, RED);
            draw_line(x + size - 4.0, y + 4.0, x + 4.0, y + size - 4.0, 2.0, RED);
        }
    }

    fn draw_bot(bot: &Bot) {
        let size = ENTITY_SIZE as f32;
        let color = if !bot.is_alive() {
            GRAY
        } else if bot.moving {
            brighten_color(bot_color(bot.room), 0.15)
        } else {
            bot_color(bot.room)
        };
        // Moving entities bob slightly
        let bob = if bot.moving { -2.0 } else { 0.0 };
        let (x, y) = (bot.position.x as f32, bot.position.y as f32 + bob);
        draw_rectangle(x, y, size, size, color);
        draw_rectangle_lines(x, y, size, size, 1.0, BLACK);
    }

    fn draw_player(game: &Game) {
        let size = ENTITY_SIZE as f32;
        let player = &game.world.player;
        let color = match game.role() {
            Role::Impostor => RED,
            Role::Crewmate => Color::from_rgba(230, 230, 240, 255),
        };
        let bob = if player.moving { -2.0 } else { 0.0 };
        let (x, y) = (player.position.x as f32, player.position.y as f32 + bob);
        draw_rectangle(x, y, size, size, color);
        draw_rectangle_lines(x - 1.0, y - 1.0, size + 2.0, size + 2.0, 2.0, GOLD);
    }

    fn draw_hud(&self, game: &Game) {
        let top = MAP_HEIGHT as f32;
        let panel = Color::from_rgba(20, 20, 50, 255);
        draw_rectangle(0.0, top, WINDOW_WIDTH as f32, HUD_HEIGHT as f32, panel);
        let edge = Color::from_rgba(40, 40, 90, 255);
        draw_line(0.0, top, WINDOW_WIDTH as f32, top, 2.0, edge);

        let role_color = match game.role() {
            Role::Impostor => RED,
            Role::Crewmate => SKYBLUE,
        };
        let text_x = if self.touch_mode { 150.0 } else { 16.0 };
        let role_label = format!("ROLE: {}", game.role());
        draw_text(&role_label, text_x, top + 30.0, 24.0, role_color);
        if let Some(room) = game.world.map.room_at(game.world.player.position) {
            let location = format!("IN: {}", room);
            draw_text(&location, text_x + 220.0, top + 30.0, 20.0, LIGHTGRAY);
        }
        if let Some(cooldown) = game.cooldown_text() {
            draw_text(&cooldown, text_x, top + 58.0, 20.0, WHITE);
        }
        draw_text(
            Game::control_instructions(self.touch_mode),
            text_x,
            top + 86.0,
            16.0,
            LIGHTGRAY,
        );

        for (slot, label) in action_buttons(game.role()).iter().enumerate() {
            let (x, y) = button_origin(slot);
            let fill = faded_color(role_color, 0.8);
            draw_rectangle(x, y, BUTTON_WIDTH, BUTTON_HEIGHT, fill);
            draw_rectangle_lines(x, y, BUTTON_WIDTH, BUTTON_HEIGHT, 2.0, WHITE);
            let dims = measure_text(label, None, 20, 1.0);
            let label_x = x + (BUTTON_WIDTH - dims.width) / 2.0;
            draw_text(label, label_x, y + 28.0, 20.0, WHITE);
        }

        if self.touch_mode {
            let (cx, cy) = JOYSTICK_CENTER;
            let stick = game.joystick();
            draw_circle(cx, cy, JOYSTICK_RADIUS as f32, faded_color(WHITE, 0.15));
            draw_circle_lines(cx, cy, JOYSTICK_RADIUS as f32, 2.0, faded_color(WHITE, 0.5));
            let (knob_x, knob_y) = (cx + stick.knob_x as f32, cy + stick.knob_y as f32);
            draw_circle(knob_x, knob_y, 16.0, faded_color(WHITE, 0.7));
        }
    }

    fn draw_menu(title: &str, subtitle: &str, rows: &[(String, Color, bool)], last: &str) {
        let total = rows.len() + 1;
        let (x, y) = menu_origin(total);
        let height = MENU_HEADER_HEIGHT + total as f32 * MENU_ROW_HEIGHT + 10.0;
        let shade = Color::from_rgba(0, 0, 0, 120);
        draw_rectangle(0.0, 0.0, WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32, shade);
        draw_rectangle(x, y, MENU_WIDTH, height, Color::from_rgba(24, 26, 40, 240));
        draw_rectangle_lines(x, y, MENU_WIDTH, height, 2.0, GOLD);
        draw_text(title, x + 16.0, y + 30.0, 28.0, GOLD);
        draw_text(subtitle, x + 16.0, y + 56.0, 18.0, LIGHTGRAY);

        let labels = rows
            .iter()
            .map(|(label, color, enabled)| (label.as_str(), *color, *enabled))
            .chain(std::iter::once((last, GRAY, true)));
        for (index, (label, color, enabled)) in labels.enumerate() {
            let row_y = y + MENU_HEADER_HEIGHT + index as f32 * MENU_ROW_HEIGHT;
            let text_color = if enabled { WHITE } else { faded_color(WHITE, 0.35) };
            let swatch = if enabled { color } else { GRAY };
            draw_rectangle(x + 12.0, row_y + 6.0, 18.0, 18.0, swatch);
            let hotkey = if index + 1 == total { 0 } else { index + 1 };
            let text = format!("{}. {}", hotkey, label);
            draw_text(&text, x + 40.0, row_y + 21.0, 20.0, text_color);
        }
    }

    fn draw_announcement(banner: &Banner, title_color: Color, hint: Option<&str>) {
        let rect_width = 500.0;
        let rect_height = 130.0;
        let x = (WINDOW_WIDTH as f32 / 2.0) - (rect_width / 2.0);
        let y = (MAP_HEIGHT as f32 / 2.0) - (rect_height / 2.0);
        let backdrop = Color::from_rgba(0, 0, 0, 200);
        draw_rectangle(x, y, rect_width, rect_height, backdrop);

        let title_dims = measure_text(&banner.title, None, 36, 1.0);
        let title_x = x + (rect_width - title_dims.width) / 2.0;
        draw_text(&banner.title, title_x, y + 44.0, 36.0, title_color);
        let message_dims = measure_text(&banner.message, None, 22, 1.0);
        let message_x = x + (rect_width - message_dims.width) / 2.0;
        draw_text(&banner.message, message_x, y + 80.0, 22.0, WHITE);

        if let Some(hint) = hint {
            let hint_dims = measure_text(hint, None, 18, 1.0);
            let hint_x = x + (rect_width - hint_dims.width) / 2.0;
            draw_text(hint, hint_x, y + rect_height - 14.0, 18.0, LIGHTGRAY);
        }
    }

    pub fn window_should_close() -> bool {
        is_key_down(KeyCode::Escape) || is_quit_requested()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_rows_hit_test() {
        let rows = 9;
        let (left, top) = menu_origin(rows);
        let first = top + MENU_HEADER_HEIGHT;
        assert_eq!(menu_row_at(left + 10.0, first + 1.0, rows), Some(0));
        let x = left + 10.0;
        assert_eq!(menu_row_at(x, first + MENU_ROW_HEIGHT * 8.5, rows), Some(8));
        assert_eq!(menu_row_at(x, first + MENU_ROW_HEIGHT * 9.5, rows), None);
        assert_eq!(menu_row_at(left - 1.0, first + 1.0, rows), None);
        assert_eq!(menu_row_at(left + 10.0, top + 5.0, rows), None);
    }

    #[test]
    fn test_buttons_hit_test() {
        let (x, y) = button_origin(1);
        assert_eq!(button_at(x + 1.0, y + 1.0, 2), Some(1));
        assert_eq!(button_at(x + 1.0, y + 1.0, 1), None);
        assert_eq!(button_at(0.0, 0.0, 2), None);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_for(KeyCode::W), Some(Key::Up));
        assert_eq!(key_for(KeyCode::Left), Some(Key::Left));
        assert_eq!(key_for(KeyCode::Space), Some(Key::Vent));
        assert_eq!(key_for(KeyCode::Key1), None);
        assert_eq!(menu_digit(KeyCode::Key0), Some(8));
    }
}
