use anchor_lang::prelude::*;

use crate::error::RewardError;
use crate::utils::REWARD_UNIT;

/// Activities the program pays rewards for.
///
/// The discriminant is the on-chain code stored in `UserRewardAccount::last_activity`
/// and accepted by `claim_reward_by_code`, so variants must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Activity {
    CheckIn = 0,
    ViewAnalytics = 1,
    VoteInPoll = 2,
    SubscribeContract = 3,
    LeaveFeedback = 4,
    CompleteProfile = 5,
    CastVote = 6,
    SendMessage = 7,
    ReferUser = 8,
    CompleteTutorial = 9,
    TestBetaFeature = 10,
    ReviewSmartContract = 11,
    DeploySmartContract = 12,
    StakeSol = 13,
    MintNft = 14,
    ProvideLiquidity = 15,
    RunValidator = 16,
    ContributeCode = 17,
}

pub struct CatalogEntry {
    pub activity: Activity,
    pub name: &'static str,
    pub base_reward: u64,
}

const fn entry(activity: Activity, name: &'static str, units: u64) -> CatalogEntry {
    CatalogEntry {
        activity,
        name,
        base_reward: units * REWARD_UNIT,
    }
}

/// Static activity catalog, indexed by activity code.
pub static ACTIVITY_CATALOG: [CatalogEntry; 18] = [
    entry(Activity::CheckIn, "check-in", 10),
    entry(Activity::ViewAnalytics, "view analytics", 10),
    entry(Activity::VoteInPoll, "vote in a poll", 10),
    entry(Activity::SubscribeContract, "subscribe to a smart contract", 10),
    entry(Activity::LeaveFeedback, "leave feedback on a dapp", 10),
    entry(Activity::CompleteProfile, "complete a profile setup", 10),
    entry(Activity::CastVote, "cast a vote", 50),
    entry(Activity::SendMessage, "send a message", 50),
    entry(Activity::ReferUser, "refer a user", 50),
    entry(Activity::CompleteTutorial, "complete a tutorial on solana usage", 50),
    entry(Activity::TestBetaFeature, "test a beta feature on a dapp", 50),
    entry(Activity::ReviewSmartContract, "review a smart contract's code", 50),
    entry(Activity::DeploySmartContract, "deploy a sample smart contract", 100),
    entry(Activity::StakeSol, "stake sol for at least 7 days", 100),
    entry(Activity::MintNft, "mint and transfer an nft", 100),
    entry(Activity::ProvideLiquidity, "provide liquidity to a protocol", 100),
    entry(Activity::RunValidator, "run a validator node for 24 hours", 100),
    entry(Activity::ContributeCode, "contribute code to an open-source project", 100),
];

impl Activity {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self> {
        ACTIVITY_CATALOG
            .get(code as usize)
            .map(|e| e.activity)
            .ok_or_else(|| error!(RewardError::UnknownActivity))
    }

    /// Names are matched exactly, no case folding.
    pub fn from_name(name: &str) -> Result<Self> {
        ACTIVITY_CATALOG
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.activity)
            .ok_or_else(|| error!(RewardError::UnknownActivity))
    }

    fn catalog_entry(self) -> &'static CatalogEntry {
        &ACTIVITY_CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.catalog_entry().name
    }

    pub fn base_reward(self) -> u64 {
        self.catalog_entry().base_reward
    }
}
