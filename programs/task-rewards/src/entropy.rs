use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hashv;

use crate::error::RewardError;
use crate::utils::validate_task_bounds;

/// Source of unpredictable draws for task redraws.
pub trait EntropySource {
    fn next_u64(&mut self) -> Result<u64>;
}

// SlotHashes sysvar layout: u64 entry count, then (slot: u64, hash: [u8; 32]) entries,
// most recent first.
const SLOT_HASHES_HEADER_LEN: usize = 8;
const SLOT_HASH_ENTRY_LEN: usize = 8 + 32;

/// Mixes the newest recent slot hash with the clock and a domain key.
///
/// The slot hash is produced by the cluster after the transaction is signed,
/// so neither the authority nor a claimant can steer the draw.
pub struct SlotHashEntropy<'a, 'info> {
    slot_hashes: &'a AccountInfo<'info>,
    clock: Clock,
    domain: Pubkey,
    counter: u64,
}

impl<'a, 'info> SlotHashEntropy<'a, 'info> {
    pub fn new(slot_hashes: &'a AccountInfo<'info>, clock: Clock, domain: Pubkey) -> Self {
        Self {
            slot_hashes,
            clock,
            domain,
            counter: 0,
        }
    }
}

impl EntropySource for SlotHashEntropy<'_, '_> {
    fn next_u64(&mut self) -> Result<u64> {
        let data = self.slot_hashes.try_borrow_data()?;
        require!(
            data.len() >= SLOT_HASHES_HEADER_LEN + SLOT_HASH_ENTRY_LEN,
            RewardError::EntropyUnavailable
        );
        let newest = &data[SLOT_HASHES_HEADER_LEN..SLOT_HASHES_HEADER_LEN + SLOT_HASH_ENTRY_LEN];

        let digest = hashv(&[
            newest,
            &self.clock.slot.to_le_bytes(),
            &self.clock.unix_timestamp.to_le_bytes(),
            self.domain.as_ref(),
            &self.counter.to_le_bytes(),
        ]);
        self.counter = self.counter.checked_add(1).ok_or(RewardError::Overflow)?;

        let mut word = [0u8; 8];
        word.copy_from_slice(&digest.to_bytes()[..8]);
        Ok(u64::from_le_bytes(word))
    }
}

/// Replays a fixed list of draws. Fails once exhausted.
#[derive(Debug, Clone, Default)]
pub struct SequenceEntropy {
    draws: Vec<u64>,
    cursor: usize,
}

impl SequenceEntropy {
    pub fn new(draws: Vec<u64>) -> Self {
        Self { draws, cursor: 0 }
    }
}

impl EntropySource for SequenceEntropy {
    fn next_u64(&mut self) -> Result<u64> {
        let draw = *self
            .draws
            .get(self.cursor)
            .ok_or(RewardError::EntropyUnavailable)?;
        self.cursor += 1;
        Ok(draw)
    }
}

/// Draws a task count in `[min_tasks, max_tasks]`, both ends inclusive.
pub fn draw_available_tasks(
    min_tasks: u8,
    max_tasks: u8,
    entropy: &mut impl EntropySource,
) -> Result<u8> {
    validate_task_bounds(min_tasks, max_tasks)?;

    let width = (max_tasks - min_tasks) as u64 + 1;
    let draw = entropy.next_u64()?;
    // width <= 256 so the modulo bias is below 2^-55
    let offset = (draw % width) as u8;

    Ok(min_tasks + offset)
}
