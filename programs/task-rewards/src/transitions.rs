use anchor_lang::prelude::*;

use crate::activity::Activity;
use crate::entropy::{draw_available_tasks, EntropySource};
use crate::error::RewardError;
use crate::state::*;
use crate::utils::{self, RewardQuote, TASK_REFRESH_INTERVAL};

// Every transition validates and computes first, then writes. A failed call
// leaves both records exactly as they were.

pub fn initialize_program(
    program_state: &mut ProgramState,
    authority: Pubkey,
    reward_mint: Pubkey,
    initial_balance: u64,
    min_tasks: u8,
    max_tasks: u8,
    now: i64,
) -> Result<()> {
    require!(
        !program_state.is_initialized,
        RewardError::AlreadyInitialized
    );
    utils::validate_task_bounds(min_tasks, max_tasks)?;

    // floor of the midpoint, always inside the bounds
    let available_tasks = ((min_tasks as u16 + max_tasks as u16) / 2) as u8;

    program_state.authority = authority;
    program_state.reward_mint = reward_mint;
    program_state.initial_balance = initial_balance;
    program_state.current_balance = initial_balance;
    program_state.total_distributed = 0;
    program_state.min_tasks = min_tasks;
    program_state.max_tasks = max_tasks;
    program_state.available_tasks = available_tasks;
    program_state.tasks_last_updated = now;
    program_state.is_initialized = true;

    Ok(())
}

/// Validates a claim against current state without writing anything.
pub fn quote_claim(
    program_state: &ProgramState,
    user_account: &UserRewardAccount,
    activity: Activity,
    now: i64,
) -> Result<RewardQuote> {
    require!(program_state.is_initialized, RewardError::NotInitialized);
    utils::check_cooldown(user_account, now)?;
    utils::calculate_reward(activity, program_state, Some(user_account))
}

pub fn process_claim(
    program_state: &mut ProgramState,
    user_account: &mut UserRewardAccount,
    user: Pubkey,
    activity: Activity,
    now: i64,
) -> Result<RewardQuote> {
    let quote = quote_claim(program_state, user_account, activity, now)?;

    let current_balance = program_state
        .current_balance
        .checked_sub(quote.reward)
        .ok_or(RewardError::InsufficientProgramFunds)?;
    let total_distributed = program_state
        .total_distributed
        .checked_add(quote.reward)
        .ok_or(RewardError::Overflow)?;
    let total_claimed = user_account
        .total_claimed
        .checked_add(quote.reward)
        .ok_or(RewardError::Overflow)?;
    let claim_count = user_account
        .claim_count
        .checked_add(1)
        .ok_or(RewardError::Overflow)?;

    program_state.current_balance = current_balance;
    program_state.total_distributed = total_distributed;

    user_account.owner = user;
    user_account.last_activity = activity.code();
    user_account.last_claim_time = now;
    user_account.consecutive_count = quote.consecutive_count;
    user_account.total_claimed = total_claimed;
    user_account.claim_count = claim_count;

    Ok(quote)
}

/// Returns the previous task count.
pub fn randomize_tasks(
    program_state: &mut ProgramState,
    caller: &Pubkey,
    entropy: &mut impl EntropySource,
    now: i64,
) -> Result<u8> {
    require!(program_state.is_initialized, RewardError::NotInitialized);
    require_keys_eq!(*caller, program_state.authority, RewardError::Unauthorized);

    let elapsed = now.saturating_sub(program_state.tasks_last_updated);
    require!(
        elapsed >= TASK_REFRESH_INTERVAL,
        RewardError::RandomizeTooSoon
    );

    let available_tasks =
        draw_available_tasks(program_state.min_tasks, program_state.max_tasks, entropy)?;

    let previous = program_state.available_tasks;
    program_state.available_tasks = available_tasks;
    program_state.tasks_last_updated = now;

    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SequenceEntropy;
    use anchor_lang::error::Error;

    const START: i64 = 1_700_000_000;

    struct Harness {
        authority: Pubkey,
        state: ProgramState,
    }

    impl Harness {
        fn new(initial_balance: u64, min_tasks: u8, max_tasks: u8) -> Self {
            let authority = Pubkey::new_unique();
            let mut state = ProgramState::default();
            initialize_program(
                &mut state,
                authority,
                Pubkey::new_unique(),
                initial_balance,
                min_tasks,
                max_tasks,
                START,
            )
            .unwrap();
            Harness { authority, state }
        }

        /// Balanced demand: min 5, max 15, midpoint 10.
        fn balanced(initial_balance: u64) -> Self {
            Self::new(initial_balance, 5, 15)
        }
    }

    fn snapshot(state: &ProgramState, account: &UserRewardAccount) -> Vec<u8> {
        let mut buf = Vec::new();
        state.serialize(&mut buf).unwrap();
        account.serialize(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_initialize_sets_midpoint_and_balance() {
        let harness = Harness::new(1_000_000, 5, 15);
        let state = &harness.state;
        assert!(state.is_initialized);
        assert_eq!(state.authority, harness.authority);
        assert_eq!(state.current_balance, 1_000_000);
        assert_eq!(state.initial_balance, 1_000_000);
        assert_eq!(state.available_tasks, 10);
        assert_eq!(state.tasks_last_updated, START);

        let odd = Harness::new(0, 5, 10);
        assert_eq!(odd.state.available_tasks, 7);
        let wide = Harness::new(0, 200, 255);
        assert_eq!(wide.state.available_tasks, 227);
    }

    #[test]
    fn test_initialize_twice_fails() {
        let mut harness = Harness::balanced(500);
        let err = initialize_program(
            &mut harness.state,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            1,
            1,
            2,
            START + 1,
        )
        .unwrap_err();
        assert_eq!(err, Error::from(RewardError::AlreadyInitialized));
        assert_eq!(harness.state.current_balance, 500);
        assert_eq!(harness.state.min_tasks, 5);
    }

    #[test]
    fn test_initialize_rejects_bad_bounds() {
        let mut state = ProgramState::default();
        let err = initialize_program(&mut state, Pubkey::new_unique(), Pubkey::new_unique(), 1, 0, 3, START)
            .unwrap_err();
        assert_eq!(err, Error::from(RewardError::InvalidTaskBounds));
        assert!(initialize_program(&mut state, Pubkey::new_unique(), Pubkey::new_unique(), 1, 4, 3, START).is_err());
        assert!(!state.is_initialized);
        assert!(initialize_program(&mut state, Pubkey::new_unique(), Pubkey::new_unique(), 0, 3, 3, START).is_ok());
    }

    #[test]
    fn test_three_votes_at_balanced_demand() {
        let mut harness = Harness::balanced(1_000_000);
        let user = Pubkey::new_unique();
        let mut account = UserRewardAccount::default();

        let mut paid = Vec::new();
        for i in 0..3 {
            let quote = process_claim(
                &mut harness.state,
                &mut account,
                user,
                Activity::VoteInPoll,
                START + 10 * i,
            )
            .unwrap();
            paid.push(quote.reward);
        }

        assert_eq!(paid, vec![10_000, 10_000, 5_000]);
        assert_eq!(harness.state.current_balance, 1_000_000 - 25_000);
        assert_eq!(harness.state.total_distributed, 25_000);
        assert_eq!(account.owner, user);
        assert_eq!(account.consecutive_count, 3);
        assert_eq!(account.total_claimed, 25_000);
        assert_eq!(account.claim_count, 3);
        assert_eq!(account.last_activity, Activity::VoteInPoll.code());
        assert_eq!(account.last_claim_time, START + 20);
    }

    #[test]
    fn test_decay_and_reset_across_activities() {
        let mut harness = Harness::balanced(10_000_000);
        let user = Pubkey::new_unique();
        let mut account = UserRewardAccount::default();
        let mut now = START;
        let mut claim = |activity: Activity, state: &mut ProgramState, account: &mut UserRewardAccount| {
            now += 5;
            process_claim(state, account, user, activity, now).unwrap().reward
        };

        let streak: Vec<u64> = (0..5)
            .map(|_| claim(Activity::CastVote, &mut harness.state, &mut account))
            .collect();
        assert_eq!(streak, vec![50_000, 50_000, 25_000, 12_500, 6_250]);

        assert_eq!(claim(Activity::CheckIn, &mut harness.state, &mut account), 10_000);
        assert_eq!(account.consecutive_count, 1);
        assert_eq!(claim(Activity::CastVote, &mut harness.state, &mut account), 50_000);
        assert_eq!(claim(Activity::CastVote, &mut harness.state, &mut account), 50_000);
        assert_eq!(claim(Activity::CastVote, &mut harness.state, &mut account), 25_000);

        let total = harness.state.initial_balance - harness.state.current_balance;
        assert_eq!(total, harness.state.total_distributed);
        assert_eq!(total, account.total_claimed);
    }

    #[test]
    fn test_cooldown_blocks_without_mutation() {
        let mut harness = Harness::balanced(1_000_000);
        let user = Pubkey::new_unique();
        let mut account = UserRewardAccount::default();

        process_claim(&mut harness.state, &mut account, user, Activity::CheckIn, START).unwrap();
        let before = snapshot(&harness.state, &account);

        for now in [START, START + 1, START + 4] {
            let err = process_claim(&mut harness.state, &mut account, user, Activity::MintNft, now)
                .unwrap_err();
            assert_eq!(err, Error::from(RewardError::CooldownActive));
            assert_eq!(snapshot(&harness.state, &account), before);
        }

        let quote =
            process_claim(&mut harness.state, &mut account, user, Activity::MintNft, START + 5).unwrap();
        assert_eq!(quote.reward, 100_000);
        assert_eq!(account.last_claim_time, START + 5);
    }

    #[test]
    fn test_users_do_not_share_cooldown() {
        let mut harness = Harness::balanced(1_000_000);
        let mut alice = UserRewardAccount::default();
        let mut bob = UserRewardAccount::default();
        let (alice_key, bob_key) = (Pubkey::new_unique(), Pubkey::new_unique());

        process_claim(&mut harness.state, &mut alice, alice_key, Activity::CheckIn, START).unwrap();
        process_claim(&mut harness.state, &mut bob, bob_key, Activity::CheckIn, START).unwrap();
        assert_eq!(harness.state.current_balance, 1_000_000 - 20_000);
        assert_eq!(alice.owner, alice_key);
        assert_eq!(bob.owner, bob_key);
        assert_eq!(bob.consecutive_count, 1);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let mut harness = Harness::balanced(60_000);
        let user = Pubkey::new_unique();
        let mut account = UserRewardAccount::default();

        process_claim(&mut harness.state, &mut account, user, Activity::CastVote, START).unwrap();
        assert_eq!(harness.state.current_balance, 10_000);

        let before = snapshot(&harness.state, &account);
        let err = process_claim(&mut harness.state, &mut account, user, Activity::RunValidator, START + 5)
            .unwrap_err();
        assert_eq!(err, Error::from(RewardError::InsufficientProgramFunds));
        assert_eq!(snapshot(&harness.state, &account), before);

        // an affordable claim still drains the rest exactly
        process_claim(&mut harness.state, &mut account, user, Activity::CheckIn, START + 5).unwrap();
        assert_eq!(harness.state.current_balance, 0);
    }

    #[test]
    fn test_empty_program_rejects_min_reward() {
        let mut harness = Harness::balanced(0);
        let mut account = UserRewardAccount::default();
        let err = process_claim(&mut harness.state, &mut account, Pubkey::new_unique(), Activity::CheckIn, START)
            .unwrap_err();
        assert_eq!(err, Error::from(RewardError::InsufficientProgramFunds));
        assert!(!account.has_claimed());
    }

    #[test]
    fn test_claim_against_uninitialized_state() {
        let mut state = ProgramState {
            current_balance: 1_000_000,
            min_tasks: 1,
            max_tasks: 1,
            available_tasks: 1,
            ..Default::default()
        };
        let mut account = UserRewardAccount::default();
        let err = process_claim(&mut state, &mut account, Pubkey::new_unique(), Activity::CheckIn, START)
            .unwrap_err();
        assert_eq!(err, Error::from(RewardError::NotInitialized));
    }

    #[test]
    fn test_quote_matches_claim() {
        let mut harness = Harness::new(1_000_000, 5, 10);
        harness.state.available_tasks = 9;
        let user = Pubkey::new_unique();
        let mut account = UserRewardAccount::default();

        let quote = quote_claim(&harness.state, &account, Activity::CheckIn, START).unwrap();
        assert!(quote.reward > 10_000 && quote.reward <= 12_000);
        assert_eq!(harness.state.current_balance, 1_000_000);

        let paid = process_claim(&mut harness.state, &mut account, user, Activity::CheckIn, START).unwrap();
        assert_eq!(paid, quote);
    }

    #[test]
    fn test_randomize_within_bounds() {
        let mut harness = Harness::new(1_000, 5, 10);
        let authority = harness.authority;
        let mut entropy = SequenceEntropy::new(vec![0, 5, 3, u64::MAX, 17, 1 << 63]);

        for i in 1..=6 {
            let now = START + TASK_REFRESH_INTERVAL * i;
            randomize_tasks(&mut harness.state, &authority, &mut entropy, now).unwrap();
            let tasks = harness.state.available_tasks;
            assert!((5..=10).contains(&tasks));
            assert_eq!(harness.state.tasks_last_updated, now);
        }
        assert_eq!(harness.state.current_balance, 1_000);
    }

    #[test]
    fn test_randomize_returns_previous_value() {
        let mut harness = Harness::new(1_000, 5, 10);
        let authority = harness.authority;
        let mut entropy = SequenceEntropy::new(vec![5]);

        let previous =
            randomize_tasks(&mut harness.state, &authority, &mut entropy, START + 10).unwrap();
        assert_eq!(previous, 7);
        assert_eq!(harness.state.available_tasks, 10);
    }

    #[test]
    fn test_randomize_rejects_non_authority() {
        let mut harness = Harness::balanced(1_000);
        let mut entropy = SequenceEntropy::new(vec![3]);
        let before = harness.state.clone();

        let err = randomize_tasks(&mut harness.state, &Pubkey::new_unique(), &mut entropy, START + 60)
            .unwrap_err();
        assert_eq!(err, Error::from(RewardError::Unauthorized));
        assert_eq!(harness.state.available_tasks, before.available_tasks);
        assert_eq!(harness.state.tasks_last_updated, before.tasks_last_updated);
    }

    #[test]
    fn test_randomize_rate_limited() {
        let mut harness = Harness::balanced(1_000);
        let authority = harness.authority;
        let mut entropy = SequenceEntropy::new(vec![0, 0]);

        let err = randomize_tasks(&mut harness.state, &authority, &mut entropy, START + 9).unwrap_err();
        assert_eq!(err, Error::from(RewardError::RandomizeTooSoon));
        assert_eq!(harness.state.available_tasks, 10);

        randomize_tasks(&mut harness.state, &authority, &mut entropy, START + 10).unwrap();
        assert_eq!(harness.state.available_tasks, 5);
    }

    #[test]
    fn test_redraw_feeds_demand_multiplier() {
        let mut harness = Harness::balanced(10_000_000);
        let authority = harness.authority;
        let mut entropy = SequenceEntropy::new(vec![10, 0]);
        let user = Pubkey::new_unique();
        let mut account = UserRewardAccount::default();

        // draw 10 -> max_tasks 15 -> +20%
        randomize_tasks(&mut harness.state, &authority, &mut entropy, START + 10).unwrap();
        let quote =
            process_claim(&mut harness.state, &mut account, user, Activity::CheckIn, START + 10).unwrap();
        assert_eq!(quote.reward, 12_000);

        // draw 0 -> min_tasks 5 -> -10%
        randomize_tasks(&mut harness.state, &authority, &mut entropy, START + 20).unwrap();
        let quote =
            process_claim(&mut harness.state, &mut account, user, Activity::CastVote, START + 20).unwrap();
        assert_eq!(quote.reward, 45_000);
    }
}
