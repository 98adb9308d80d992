// Action rejections and parse errors

use thiserror::Error;

/// Reasons a player action is rejected. Rejections never change state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    #[error("Action not available to the player's role")]
    WrongRole,
    #[error("Action not allowed in the current game state")]
    WrongState,
    #[error("Ability on cooldown ({remaining_ms} ms remaining)")]
    OnCooldown { remaining_ms: u64 },
    #[error("Must be in the cafeteria to call an emergency meeting")]
    OutsideCafeteria,
    #[error("No alive bot within range")]
    NoTargetInRange,
    #[error("Bot is already dead")]
    BotAlreadyDead,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown room '{0}'")]
pub struct ParseRoomError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown role '{0}' (expected crewmate or impostor)")]
pub struct ParseRoleError(pub String);
