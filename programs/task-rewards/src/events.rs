use anchor_lang::prelude::*;

// Events
#[event]
pub struct ProgramInitializedEvent {
    pub authority: Pubkey,
    pub reward_mint: Pubkey,
    pub initial_balance: u64,
    pub min_tasks: u8,
    pub max_tasks: u8,
    pub available_tasks: u8,
    pub timestamp: i64,
}

#[event]
pub struct RewardClaimedEvent {
    pub user: Pubkey,
    pub activity: u8,
    pub base_reward: u64,
    /// Demand multiplier in basis points, 10_000 = 1.0x
    pub multiplier_bps: u64,
    pub consecutive_count: u32,
    pub amount: u64,
    pub remaining_balance: u64,
    pub timestamp: i64,
}

#[event]
pub struct TasksRandomizedEvent {
    pub previous_tasks: u8,
    pub available_tasks: u8,
    pub timestamp: i64,
}
