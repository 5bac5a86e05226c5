//! Good Tidings tier progression

use thiserror::Error;

use crate::catalog::{SigilKind, TierTrackConfig};
use crate::sigil::{SigilCounts, SigilLedger};

/// Why a tier move was absorbed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TierRejection {
    #[error("unknown tier")]
    UnknownTier,

    #[error("no {} sigil available", .0.key())]
    NoCapacity(SigilKind),
}

/// Resolve a request for tier `requested` while `current` is held
///
/// - Requesting the held tier demotes it by one step.
/// - Requesting a lower tier is a free downgrade.
/// - Requesting a higher tier needs one unit for every tier passed.
///
/// Returns the tier to hold afterwards.
pub fn resolve_tier_move(
    track: &TierTrackConfig,
    current: Option<usize>,
    requested: usize,
    ledger: &SigilLedger,
) -> Result<Option<usize>, TierRejection> {
    if requested >= track.tiers.len() {
        return Err(TierRejection::UnknownTier);
    }

    match current {
        Some(held) if held == requested => return Ok(requested.checked_sub(1)),
        Some(held) if requested < held => return Ok(Some(requested)),
        _ => {}
    }

    let first = current.map_or(0, |held| held + 1);
    let mut needed = SigilCounts::default();
    for config in &track.tiers[first..=requested] {
        needed[config.sigil] += 1;
    }
    if let Some((kind, _)) = needed
        .iter()
        .find(|&(kind, count)| count > ledger.available(kind))
    {
        return Err(TierRejection::NoCapacity(kind));
    }

    Ok(Some(requested))
}
