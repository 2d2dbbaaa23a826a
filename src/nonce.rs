//! Safe Nonce Reconciliation
//!
//! Decides the nonce of the first chunk on a network from the wallet's
//! confirmed nonce and the proposals already queued at the relay.
//! Resolution is a pure function; fetching the inputs is the submitter's job.

use crate::error::{SubmitError, SubmitResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Types
// =============================================================================

/// How to choose the starting nonce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "nonce")]
pub enum NoncePolicy {
    /// Use this nonce; no relay lookup is made
    Explicit(u64),
    /// Start at the confirmed nonce, replacing queued proposals
    Force,
    /// Start after the highest queued proposal
    SkipPending,
    /// Start at the confirmed nonce and warn about queued proposals
    #[default]
    Default,
}

impl NoncePolicy {
    /// Whether resolving this policy needs the wallet's pending queue
    pub fn needs_pending(&self) -> bool {
        !matches!(self, NoncePolicy::Explicit(_))
    }
}

impl fmt::Display for NoncePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoncePolicy::Explicit(n) => write!(f, "explicit({})", n),
            NoncePolicy::Force => write!(f, "force"),
            NoncePolicy::SkipPending => write!(f, "skip-pending"),
            NoncePolicy::Default => write!(f, "default"),
        }
    }
}

/// Outcome of nonce resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceResolution {
    /// Nonce of the first chunk
    pub base_nonce: u64,
    /// Operator-facing notice, if the queue needed attention
    pub notice: Option<String>,
}

/// Queued proposals at or above the confirmed nonce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSummary {
    pub count: usize,
    pub lowest: u64,
    pub highest: u64,
}

// =============================================================================
// Public API
// =============================================================================

/// Summarize live pending nonces; those below `confirmed` are stale.
pub fn pending_summary(confirmed: u64, pending: &[u64]) -> Option<PendingSummary> {
    let live: Vec<u64> = pending.iter().copied().filter(|&n| n >= confirmed).collect();
    let lowest = *live.iter().min()?;
    let highest = *live.iter().max()?;
    Some(PendingSummary {
        count: live.len(),
        lowest,
        highest,
    })
}

/// Resolve the starting nonce for one network.
///
/// Fails with a `Network` error when the relay reports a pending nonce at
/// `u64::MAX`, since nothing can be queued after it.
pub fn resolve(policy: NoncePolicy, confirmed: u64, pending: &[u64]) -> SubmitResult<NonceResolution> {
    if let NoncePolicy::Explicit(nonce) = policy {
        return Ok(NonceResolution {
            base_nonce: nonce,
            notice: None,
        });
    }

    let Some(summary) = pending_summary(confirmed, pending) else {
        return Ok(NonceResolution {
            base_nonce: confirmed,
            notice: None,
        });
    };

    let resolution = match policy {
        NoncePolicy::Force => NonceResolution {
            base_nonce: confirmed,
            notice: Some(format!(
                "replacing {} pending proposal(s) at nonces {}..={}",
                summary.count, summary.lowest, summary.highest
            )),
        },
        NoncePolicy::SkipPending => {
            let base_nonce = summary.highest.checked_add(1).ok_or_else(|| {
                SubmitError::network(format!(
                    "relay reports pending nonce {}, no nonce left to queue after it",
                    summary.highest
                ))
            })?;
            NonceResolution {
                base_nonce,
                notice: Some(format!(
                    "skipping {} pending proposal(s), starting at nonce {}",
                    summary.count, base_nonce
                )),
            }
        }
        _ => NonceResolution {
            base_nonce: confirmed,
            notice: Some(format!(
                "{} pending proposal(s) at nonces {}..={}; new proposals will compete for nonce {} \
                 (use --skip-pending to queue after them or --force to replace them)",
                summary.count, summary.lowest, summary.highest, confirmed
            )),
        },
    };
    Ok(resolution)
}

/// Nonce of the 1-based chunk `index`
pub fn chunk_nonce(base_nonce: u64, index: usize) -> SubmitResult<u64> {
    u64::try_from(index.saturating_sub(1))
        .ok()
        .and_then(|offset| base_nonce.checked_add(offset))
        .ok_or_else(|| {
            SubmitError::configuration(format!(
                "nonce of part {} overflows starting at nonce {}",
                index, base_nonce
            ))
        })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_skip_pending_after_highest() {
        let resolution = resolve(NoncePolicy::SkipPending, 5, &[5, 6, 7]).unwrap();
        assert_eq!(resolution.base_nonce, 8);
        assert!(resolution.notice.unwrap().contains("3 pending"));
    }

    #[test]
    fn test_empty_queue_converges_to_confirmed() {
        for policy in [NoncePolicy::SkipPending, NoncePolicy::Force, NoncePolicy::Default] {
            let resolution = resolve(policy, 5, &[]).unwrap();
            assert_eq!(resolution.base_nonce, 5, "{}", policy);
            assert!(resolution.notice.is_none());
        }
    }

    #[test]
    fn test_force_replaces_pending() {
        let resolution = resolve(NoncePolicy::Force, 5, &[5, 6]).unwrap();
        assert_eq!(resolution.base_nonce, 5);
        assert!(resolution.notice.unwrap().contains("replacing 2"));
    }

    #[test]
    fn test_default_warns_without_moving() {
        let resolution = resolve(NoncePolicy::Default, 5, &[6]).unwrap();
        assert_eq!(resolution.base_nonce, 5);
        assert!(resolution.notice.is_some());
    }

    #[test]
    fn test_explicit_ignores_state() {
        let resolution = resolve(NoncePolicy::Explicit(42), 5, &[5, 6, 7]).unwrap();
        assert_eq!(resolution.base_nonce, 42);
        assert!(resolution.notice.is_none());
        assert!(!NoncePolicy::Explicit(42).needs_pending());
        assert!(NoncePolicy::SkipPending.needs_pending());
    }

    #[test]
    fn test_stale_pending_ignored() {
        // executed proposals the relay still lists below the confirmed nonce
        let resolution = resolve(NoncePolicy::SkipPending, 5, &[2, 3, 4]).unwrap();
        assert_eq!(resolution.base_nonce, 5);
        assert!(resolution.notice.is_none());

        assert_eq!(pending_summary(5, &[3, 9, 6]).unwrap().count, 2);
        assert!(pending_summary(5, &[1]).is_none());
    }

    #[test]
    fn test_chunk_nonce_sequence() {
        let nonces: Vec<_> = (1..=3).map(|i| chunk_nonce(8, i).unwrap()).collect();
        assert_eq!(nonces, vec![8, 9, 10]);
    }

    #[test]
    fn test_chunk_nonce_overflow() {
        assert_eq!(chunk_nonce(u64::MAX, 1).unwrap(), u64::MAX);

        let err = chunk_nonce(u64::MAX, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::Configuration);
        assert!(chunk_nonce(u64::MAX - 1, 3).is_err());
    }

    #[test]
    fn test_skip_pending_at_max_nonce() {
        let err = resolve(NoncePolicy::SkipPending, 0, &[u64::MAX]).unwrap_err();
        assert_eq!(err.code, ErrorCode::Network);

        // only skipping needs room after the queue
        let forced = resolve(NoncePolicy::Force, 0, &[u64::MAX]).unwrap();
        assert_eq!(forced.base_nonce, 0);
        assert_eq!(
            resolve(NoncePolicy::SkipPending, 0, &[u64::MAX - 1]).unwrap().base_nonce,
            u64::MAX
        );
    }

    #[test]
    fn test_policy_serialization() {
        let json = serde_json::to_string(&NoncePolicy::Explicit(3)).unwrap();
        assert_eq!(json, r#"{"policy":"explicit","nonce":3}"#);
        let parsed: NoncePolicy = serde_json::from_str(r#"{"policy":"skip_pending"}"#).unwrap();
        assert_eq!(parsed, NoncePolicy::SkipPending);
    }
}
