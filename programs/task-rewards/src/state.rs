use anchor_lang::prelude::*;

// State accounts
#[account]
#[derive(InitSpace, Default)]
pub struct ProgramState {
    pub authority: Pubkey,
    pub reward_mint: Pubkey,
    pub initial_balance: u64,
    pub current_balance: u64,
    pub total_distributed: u64,
    pub min_tasks: u8,
    pub max_tasks: u8,
    pub available_tasks: u8,
    pub tasks_last_updated: i64,
    pub is_initialized: bool,
}

#[account]
#[derive(InitSpace, Default)]
pub struct UserRewardAccount {
    /// Zero until the first successful claim.
    pub owner: Pubkey,
    pub last_activity: u8,
    pub last_claim_time: i64,
    pub consecutive_count: u32,
    pub total_claimed: u64,
    pub claim_count: u64,
}

impl UserRewardAccount {
    pub fn has_claimed(&self) -> bool {
        self.owner != Pubkey::default()
    }
}
