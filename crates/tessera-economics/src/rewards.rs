// crates/tessera-economics/src/rewards.rs
//
// Time-proportional reward accrual for staked principal.
//
// Rewards are simple (non-compounding) linear interest:
//
//   reward = principal * apr_bps * elapsed / (10_000 * SECONDS_PER_YEAR)
//
// The division always rounds down. The remainder of the numerator is returned
// as a carry and fed into the next accrual step, so splitting an interval into
// many steps pays exactly what a single step over the whole interval would.

use serde::{Deserialize, Serialize};

use crate::token::Grain;
use tessera_core::error::TesseraError;

/// Seconds in a (non-leap) year: 365 * 86,400.
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// Basis points in 100 %.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default annual rate: 8 % (800 bps).
pub const DEFAULT_APR_BPS: u32 = 800;

const YEAR_DENOMINATOR: u128 = BPS_DENOMINATOR as u128 * SECONDS_PER_YEAR as u128;

/// Result of one accrual step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Accrual {
    /// Whole grains earned in this step.
    pub reward: Grain,
    /// Sub-grain remainder to carry into the next step. Always below the year denominator.
    pub carry: u128,
}

/// Accrue reward on `principal` over `elapsed_secs` at `apr_bps`, starting from `carry`.
///
/// Uses the identity `floor((p*k + c) / d) = (p / d)*k + floor(((p % d)*k + c) / d)`
/// so the full product `p * k` is never materialised.
///
/// # Errors
/// Returns `TesseraError::Arithmetic` if the reward does not fit in u128.
pub fn accrue(
    principal: Grain,
    apr_bps: u32,
    elapsed_secs: u64,
    carry: u128,
) -> Result<Accrual, TesseraError> {
    if principal == 0 || apr_bps == 0 || elapsed_secs == 0 {
        return Ok(Accrual {
            reward: 0,
            carry: carry % YEAR_DENOMINATOR,
        });
    }

    let overflow = || {
        TesseraError::Arithmetic(format!(
            "reward on {} grains over {}s at {} bps overflows",
            principal, elapsed_secs, apr_bps
        ))
    };

    let rate = apr_bps as u128 * elapsed_secs as u128;
    let quotient = principal / YEAR_DENOMINATOR;
    let remainder = principal % YEAR_DENOMINATOR;

    let head = quotient.checked_mul(rate).ok_or_else(overflow)?;
    let tail = remainder
        .checked_mul(rate)
        .and_then(|t| t.checked_add(carry))
        .ok_or_else(overflow)?;

    let reward = head
        .checked_add(tail / YEAR_DENOMINATOR)
        .ok_or_else(overflow)?;

    Ok(Accrual {
        reward,
        carry: tail % YEAR_DENOMINATOR,
    })
}

/// Reward for a single interval with no prior carry.
pub fn reward_for(principal: Grain, apr_bps: u32, elapsed_secs: u64) -> Result<Grain, TesseraError> {
    accrue(principal, apr_bps, elapsed_secs, 0).map(|a| a.reward)
}
