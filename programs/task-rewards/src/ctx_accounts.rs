use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::slot_hashes;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::state::*;
use crate::utils::{PROGRAM_STATE_SEED, REWARD_VAULT_SEED, USER_REWARD_SEED};

// Contexts
#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    pub reward_mint: InterfaceAccount<'info, Mint>,

    // init_if_needed so a repeated call reaches the AlreadyInitialized check
    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + ProgramState::INIT_SPACE,
        seeds = [PROGRAM_STATE_SEED, reward_mint.key().as_ref()],
        bump
    )]
    pub program_state: Account<'info, ProgramState>,

    #[account(
        init_if_needed,
        payer = authority,
        token::mint = reward_mint,
        token::authority = reward_vault,
        token::token_program = token_program,
        seeds = [REWARD_VAULT_SEED, program_state.key().as_ref()],
        bump,
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub authority_token_account: InterfaceAccount<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
}

#[derive(Accounts)]
pub struct ClaimReward<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    pub reward_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        seeds = [PROGRAM_STATE_SEED, reward_mint.key().as_ref()],
        bump,
    )]
    pub program_state: Account<'info, ProgramState>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + UserRewardAccount::INIT_SPACE,
        seeds = [
            USER_REWARD_SEED,
            user.key().as_ref(),
            program_state.key().as_ref()
        ],
        bump
    )]
    pub user_reward_account: Account<'info, UserRewardAccount>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = reward_mint,
        associated_token::authority = user,
        associated_token::token_program = token_program,
    )]
    pub user_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED, program_state.key().as_ref()],
        bump,
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
}

#[derive(Accounts)]
pub struct RandomizeTasks<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_STATE_SEED, program_state.reward_mint.as_ref()],
        bump,
    )]
    pub program_state: Account<'info, ProgramState>,

    /// CHECK: address-checked SlotHashes sysvar, read raw as an entropy source
    #[account(address = slot_hashes::ID)]
    pub recent_slothashes: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct PreviewReward<'info> {
    /// CHECK: read only, used to derive the reward account address
    pub user: UncheckedAccount<'info>,

    #[account(
        seeds = [PROGRAM_STATE_SEED, program_state.reward_mint.as_ref()],
        bump,
    )]
    pub program_state: Account<'info, ProgramState>,

    /// CHECK: may not exist yet, deserialized manually when it does
    #[account(
        seeds = [
            USER_REWARD_SEED,
            user.key().as_ref(),
            program_state.key().as_ref()
        ],
        bump
    )]
    pub user_reward_account: UncheckedAccount<'info>,
}
