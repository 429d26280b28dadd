use crate::activity::Activity;
use crate::error::RewardError;
use crate::state::*;
use anchor_lang::prelude::*;

// Constants
pub const REWARD_UNIT: u64 = 1_000;
pub const COOLDOWN_PERIOD: i64 = 5; // seconds between claims of one user
pub const TASK_REFRESH_INTERVAL: i64 = 10; // seconds between task redraws
pub const MIN_REWARD: u64 = 1;

pub const BPS_DENOMINATOR: u64 = 10_000;
pub const MAX_BONUS_BPS: u64 = 2_000; // +20% at max_tasks
pub const MAX_PENALTY_BPS: u64 = 1_000; // -10% at min_tasks

pub const PROGRAM_STATE_SEED: &[u8] = b"program_state";
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";
pub const USER_REWARD_SEED: &[u8] = b"user_reward";

pub fn validate_task_bounds(min_tasks: u8, max_tasks: u8) -> Result<()> {
    require!(min_tasks >= 1, RewardError::InvalidTaskBounds);
    require!(max_tasks >= min_tasks, RewardError::InvalidTaskBounds);
    Ok(())
}

/// Supply/demand factor as an exact fraction.
///
/// Linear in `available_tasks` on each side of the midpoint of
/// `[min_tasks, max_tasks]`: 1.0 at the midpoint, 1.20 at `max_tasks`,
/// 0.90 at `min_tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandMultiplier {
    numerator: u128,
    denominator: u128,
}

impl DemandMultiplier {
    pub const NEUTRAL: DemandMultiplier = DemandMultiplier {
        numerator: 1,
        denominator: 1,
    };

    pub fn from_supply(available_tasks: u8, min_tasks: u8, max_tasks: u8) -> Result<Self> {
        validate_task_bounds(min_tasks, max_tasks)?;
        require!(
            available_tasks >= min_tasks && available_tasks <= max_tasks,
            RewardError::InvalidTaskBounds
        );

        // Both measured in half-task steps so an odd-width range keeps an exact midpoint.
        let spread = (max_tasks - min_tasks) as i128;
        let offset = 2 * available_tasks as i128 - min_tasks as i128 - max_tasks as i128;

        if spread == 0 || offset == 0 {
            return Ok(Self::NEUTRAL);
        }

        let denominator = BPS_DENOMINATOR as i128 * spread;
        let slope_bps = if offset > 0 {
            MAX_BONUS_BPS
        } else {
            MAX_PENALTY_BPS
        };
        let slope = slope_bps as i128;
        let numerator = denominator + slope * offset;

        Ok(DemandMultiplier {
            numerator: numerator as u128,
            denominator: denominator as u128,
        })
    }

    pub fn for_state(state: &ProgramState) -> Result<Self> {
        Self::from_supply(state.available_tasks, state.min_tasks, state.max_tasks)
    }

    /// `round_half_up(amount * multiplier)`
    pub fn apply(&self, amount: u64) -> Result<u64> {
        let scaled = (amount as u128)
            .checked_mul(self.numerator)
            .ok_or(RewardError::Overflow)?
            .checked_add(self.denominator / 2)
            .ok_or(RewardError::Overflow)?
            / self.denominator;

        u64::try_from(scaled).map_err(|_| RewardError::Overflow.into())
    }

    /// Truncated to whole basis points, for logs and events.
    pub fn as_bps(&self) -> u64 {
        (self.numerator * BPS_DENOMINATOR as u128 / self.denominator) as u64
    }
}

/// Streak bookkeeping for a claim of `activity` by `account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakStep {
    /// `consecutive_count` after the claim
    pub consecutive_count: u32,
    /// how many times the demand-adjusted reward is halved
    pub halvings: u32,
}

pub fn next_streak(account: Option<&UserRewardAccount>, activity: Activity) -> StreakStep {
    match account {
        Some(account) if account.has_claimed() && account.last_activity == activity.code() => {
            let previous = account.consecutive_count.max(1);
            StreakStep {
                consecutive_count: previous.saturating_add(1),
                halvings: previous - 1,
            }
        }
        _ => StreakStep {
            consecutive_count: 1,
            halvings: 0,
        },
    }
}

pub fn apply_farming_decay(demand_adjusted: u64, halvings: u32) -> u64 {
    demand_adjusted.checked_shr(halvings).unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardQuote {
    pub activity: Activity,
    pub base_reward: u64,
    pub multiplier: DemandMultiplier,
    pub demand_adjusted: u64,
    pub consecutive_count: u32,
    pub reward: u64,
}

pub fn calculate_reward(
    activity: Activity,
    program_state: &ProgramState,
    account: Option<&UserRewardAccount>,
) -> Result<RewardQuote> {
    let base_reward = activity.base_reward();

    let multiplier = DemandMultiplier::for_state(program_state)?;
    let demand_adjusted = multiplier.apply(base_reward)?;

    let streak = next_streak(account, activity);
    let reward = apply_farming_decay(demand_adjusted, streak.halvings).max(MIN_REWARD);

    require!(
        reward <= program_state.current_balance,
        RewardError::InsufficientProgramFunds
    );

    Ok(RewardQuote {
        activity,
        base_reward,
        multiplier,
        demand_adjusted,
        consecutive_count: streak.consecutive_count,
        reward,
    })
}

pub fn check_cooldown(account: &UserRewardAccount, now: i64) -> Result<()> {
    if !account.has_claimed() {
        return Ok(());
    }

    // A clock behind the last claim counts as still cooling down.
    let elapsed = now.saturating_sub(account.last_claim_time);
    require!(elapsed >= COOLDOWN_PERIOD, RewardError::CooldownActive);
    Ok(())
}
