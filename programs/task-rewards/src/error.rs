use anchor_lang::prelude::*;

// Errors
#[error_code]
pub enum RewardError {
    #[msg("Unknown activity")]
    UnknownActivity,
    #[msg("Cooldown is active")]
    CooldownActive,
    #[msg("Insufficient program funds")]
    InsufficientProgramFunds,
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Program state already initialized")]
    AlreadyInitialized,
    #[msg("Invalid task bounds")]
    InvalidTaskBounds,
    #[msg("Tasks were randomized too recently")]
    RandomizeTooSoon,
    #[msg("Entropy source unavailable")]
    EntropyUnavailable,
    #[msg("Program state not initialized")]
    NotInitialized,
    #[msg("Overflow")]
    Overflow,
    #[msg("Underflow")]
    Underflow,
}
