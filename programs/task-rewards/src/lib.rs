#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{transfer_checked, TransferChecked};
use solana_security_txt::security_txt;

// Import modules
mod activity;
mod ctx_accounts;
mod entropy;
mod error;
mod events;
mod state;
mod transitions;
mod utils;

// Re-export for use
pub use activity::*;
use ctx_accounts::*;
pub use entropy::*;
pub use error::*;
use events::*;
pub use state::*;

declare_id!("4FsgpRZLeFDbAU6sAZ8VRHJx6dLcBJp1Tvb5RiyX6c1P");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "Task Rewards Program",
    project_url: "https://github.com/task-rewards/task-rewards",
    contacts: "email:security@task-rewards.dev",
    policy: "#/blob/main/SECURITY.md",
    preferred_languages: "en",
    source_code: "https://github.com/task-rewards/task-rewards"
}

#[program]
pub mod task_rewards {
    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        initial_balance: u64,
        min_tasks: u8,
        max_tasks: u8,
    ) -> Result<()> {
        let current_time = Clock::get()?.unix_timestamp;

        transitions::initialize_program(
            &mut ctx.accounts.program_state,
            ctx.accounts.authority.key(),
            ctx.accounts.reward_mint.key(),
            initial_balance,
            min_tasks,
            max_tasks,
            current_time,
        )?;

        // Fund the reward vault with the initial balance
        if initial_balance > 0 {
            let cpi_accounts = TransferChecked {
                from: ctx.accounts.authority_token_account.to_account_info(),
                to: ctx.accounts.reward_vault.to_account_info(),
                authority: ctx.accounts.authority.to_account_info(),
                mint: ctx.accounts.reward_mint.to_account_info(),
            };

            let cpi_program = ctx.accounts.token_program.to_account_info();
            let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);

            let before = ctx.accounts.reward_vault.amount;
            transfer_checked(cpi_ctx, initial_balance, ctx.accounts.reward_mint.decimals)?;
            ctx.accounts.reward_vault.reload()?;

            // Transfer-fee mints would leave the vault short of current_balance
            let received = ctx
                .accounts
                .reward_vault
                .amount
                .checked_sub(before)
                .ok_or(RewardError::Underflow)?;
            require!(
                received == initial_balance,
                RewardError::InsufficientProgramFunds
            );
        }

        let program_state = &ctx.accounts.program_state;
        msg!(
            "Program initialized with {} reward units, tasks {}..={} (start {})",
            initial_balance,
            program_state.min_tasks,
            program_state.max_tasks,
            program_state.available_tasks
        );

        emit!(ProgramInitializedEvent {
            authority: program_state.authority,
            reward_mint: program_state.reward_mint,
            initial_balance,
            min_tasks: program_state.min_tasks,
            max_tasks: program_state.max_tasks,
            available_tasks: program_state.available_tasks,
            timestamp: current_time,
        });

        Ok(())
    }

    pub fn claim_reward(ctx: Context<ClaimReward>, activity: String) -> Result<u64> {
        let activity = Activity::from_name(&activity)?;
        process_claim_reward(ctx, activity)
    }

    pub fn claim_reward_by_code(ctx: Context<ClaimReward>, code: u8) -> Result<u64> {
        let activity = Activity::from_code(code)?;
        process_claim_reward(ctx, activity)
    }

    pub fn randomize_tasks(ctx: Context<RandomizeTasks>) -> Result<()> {
        let clock = Clock::get()?;
        let current_time = clock.unix_timestamp;

        let slot_hashes = ctx.accounts.recent_slothashes.to_account_info();
        let program_state_key = ctx.accounts.program_state.key();
        let mut entropy = SlotHashEntropy::new(&slot_hashes, clock, program_state_key);

        let program_state = &mut ctx.accounts.program_state;
        let previous_tasks = transitions::randomize_tasks(
            program_state,
            ctx.accounts.authority.key,
            &mut entropy,
            current_time,
        )?;

        msg!(
            "Available tasks randomized: {} -> {}",
            previous_tasks,
            program_state.available_tasks
        );

        emit!(TasksRandomizedEvent {
            previous_tasks,
            available_tasks: program_state.available_tasks,
            timestamp: current_time,
        });

        Ok(())
    }

    // View-only: computes what a claim would pay now, writes nothing
    pub fn preview_reward(ctx: Context<PreviewReward>, activity: String) -> Result<u64> {
        let activity = Activity::from_name(&activity)?;
        let current_time = Clock::get()?.unix_timestamp;

        let account_info = ctx.accounts.user_reward_account.to_account_info();
        let user_account = if account_info.data_is_empty() {
            UserRewardAccount::default()
        } else {
            require_keys_eq!(*account_info.owner, crate::ID, RewardError::Unauthorized);
            let data = account_info.try_borrow_data()?;
            UserRewardAccount::try_deserialize(&mut data.as_ref())?
        };

        let quote = transitions::quote_claim(
            &ctx.accounts.program_state,
            &user_account,
            activity,
            current_time,
        )?;

        Ok(quote.reward)
    }
}

fn process_claim_reward(ctx: Context<ClaimReward>, activity: Activity) -> Result<u64> {
    let current_time = Clock::get()?.unix_timestamp;
    let user_key = ctx.accounts.user.key();

    let quote = transitions::process_claim(
        &mut ctx.accounts.program_state,
        &mut ctx.accounts.user_reward_account,
        user_key,
        activity,
        current_time,
    )?;

    msg!(
        "Claim '{}': base {} x {} bps -> {}, streak {} -> reward {}",
        activity.name(),
        quote.base_reward,
        quote.multiplier.as_bps(),
        quote.demand_adjusted,
        quote.consecutive_count,
        quote.reward
    );

    // Pay the reward out of the vault
    let program_state_key = ctx.accounts.program_state.key();
    let seeds = &[
        utils::REWARD_VAULT_SEED,
        program_state_key.as_ref(),
        &[ctx.bumps.reward_vault],
    ];
    let signer = &[&seeds[..]];

    let cpi_accounts = TransferChecked {
        from: ctx.accounts.reward_vault.to_account_info(),
        to: ctx.accounts.user_token_account.to_account_info(),
        authority: ctx.accounts.reward_vault.to_account_info(),
        mint: ctx.accounts.reward_mint.to_account_info(),
    };

    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer);

    transfer_checked(cpi_ctx, quote.reward, ctx.accounts.reward_mint.decimals)?;

    emit!(RewardClaimedEvent {
        user: user_key,
        activity: activity.code(),
        base_reward: quote.base_reward,
        multiplier_bps: quote.multiplier.as_bps(),
        consecutive_count: quote.consecutive_count,
        amount: quote.reward,
        remaining_balance: ctx.accounts.program_state.current_balance,
        timestamp: current_time,
    });

    Ok(quote.reward)
}
