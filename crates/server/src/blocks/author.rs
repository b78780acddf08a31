//! Block author extraction from the header digest.

use super::types::DigestLog;
use parity_scale_codec::Decode;
use sp_consensus_babe::digests::PreDigest;
use sp_core::crypto::{AccountId32, Ss58Codec};
use sp_runtime::ConsensusEngineId;

/// A consensus engine able to name the author of a block from its digest payload
pub trait AuthorEngine {
    fn engine_id(&self) -> ConsensusEngineId;

    fn author(&self, payload: &[u8], validators: &[AccountId32]) -> Option<AccountId32>;
}

pub struct Babe;

impl AuthorEngine for Babe {
    fn engine_id(&self) -> ConsensusEngineId {
        *b"BABE"
    }

    fn author(&self, payload: &[u8], validators: &[AccountId32]) -> Option<AccountId32> {
        let digest = PreDigest::decode(&mut &payload[..])
            .inspect_err(|e| tracing::debug!("Failed to decode BABE pre-digest: {}", e))
            .ok()?;
        validators.get(digest.authority_index() as usize).cloned()
    }
}

pub struct Aura;

impl AuthorEngine for Aura {
    fn engine_id(&self) -> ConsensusEngineId {
        *b"aura"
    }

    fn author(&self, payload: &[u8], validators: &[AccountId32]) -> Option<AccountId32> {
        if validators.is_empty() {
            return None;
        }
        let slot = u64::decode(&mut &payload[..]).ok()?;
        validators
            .get((slot % validators.len() as u64) as usize)
            .cloned()
    }
}

pub struct Pow;

impl AuthorEngine for Pow {
    fn engine_id(&self) -> ConsensusEngineId {
        *b"pow_"
    }

    fn author(&self, payload: &[u8], _validators: &[AccountId32]) -> Option<AccountId32> {
        <[u8; 32]>::try_from(payload).ok().map(AccountId32::from)
    }
}

const ENGINES: &[&dyn AuthorEngine] = &[&Babe, &Aura, &Pow];

/// Resolve the author from the first `PreRuntime` log, or failing that the first `Consensus` log.
///
/// An unknown engine or a missing validator set yields `None`.
pub fn resolve(
    validators: Option<&[AccountId32]>,
    logs: &[DigestLog],
    ss58_prefix: u16,
) -> Option<String> {
    let validators = validators?;

    let (engine_id, payload) = logs
        .iter()
        .find_map(|log| match log {
            DigestLog::PreRuntime { engine, payload } => Some((engine, payload)),
            _ => None,
        })
        .or_else(|| {
            logs.iter().find_map(|log| match log {
                DigestLog::Consensus { engine, payload } => Some((engine, payload)),
                _ => None,
            })
        })?;

    let engine = ENGINES.iter().find(|e| e.engine_id() == *engine_id)?;
    engine
        .author(payload, validators)
        .map(|author| author.to_ss58check_with_version(ss58_prefix.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parity_scale_codec::Encode;
    use sp_consensus_babe::digests::SecondaryPlainPreDigest;

    fn validators() -> Vec<AccountId32> {
        (1..=4u8).map(|i| AccountId32::new([i; 32])).collect()
    }

    fn ss58(account: &AccountId32) -> String {
        account.to_ss58check_with_version(0u16.into())
    }

    fn babe_log(authority_index: u32) -> DigestLog {
        let digest = PreDigest::SecondaryPlain(SecondaryPlainPreDigest {
            authority_index,
            slot: 1234u64.into(),
        });
        DigestLog::PreRuntime {
            engine: *b"BABE",
            payload: digest.encode(),
        }
    }

    #[test]
    fn test_babe_author() {
        let validators = validators();
        let author = resolve(Some(&validators[..]), &[babe_log(2)], 0);
        assert_eq!(author, Some(ss58(&validators[2])));
    }

    #[test]
    fn test_babe_index_out_of_range() {
        assert_eq!(resolve(Some(&validators()[..]), &[babe_log(9)], 0), None);
    }

    #[test]
    fn test_aura_slot_modulo() {
        let validators = validators();
        let logs = [DigestLog::PreRuntime {
            engine: *b"aura",
            payload: 10u64.encode(),
        }];
        assert_eq!(resolve(Some(&validators[..]), &logs, 0), Some(ss58(&validators[2])));
        assert_eq!(resolve(Some(&[][..]), &logs, 0), None);
    }

    #[test]
    fn test_consensus_log_used_without_pre_runtime() {
        let validators = validators();
        let logs = [
            DigestLog::Seal {
                engine: *b"aura",
                payload: vec![0; 64],
            },
            DigestLog::Consensus {
                engine: *b"aura",
                payload: 5u64.encode(),
            },
        ];
        assert_eq!(resolve(Some(&validators[..]), &logs, 0), Some(ss58(&validators[1])));
    }

    #[test]
    fn test_pre_runtime_wins_over_consensus() {
        let validators = validators();
        let logs = [
            DigestLog::Consensus {
                engine: *b"aura",
                payload: 0u64.encode(),
            },
            babe_log(3),
        ];
        assert_eq!(resolve(Some(&validators[..]), &logs, 0), Some(ss58(&validators[3])));
    }

    #[test]
    fn test_pow_author_and_prefix() {
        let account = AccountId32::new([9; 32]);
        let logs = [DigestLog::PreRuntime {
            engine: *b"pow_",
            payload: AsRef::<[u8]>::as_ref(&account).to_vec(),
        }];
        assert_eq!(
            resolve(Some(&[][..]), &logs, 42),
            Some(account.to_ss58check_with_version(42u16.into()))
        );
    }

    #[test]
    fn test_unknown_engine_and_missing_validators() {
        let logs = [DigestLog::PreRuntime {
            engine: *b"nmbs",
            payload: vec![1, 2, 3],
        }];
        assert_eq!(resolve(Some(&validators()[..]), &logs, 0), None);
        assert_eq!(resolve(None, &[babe_log(0)], 0), None);
        assert_eq!(resolve(Some(&validators()[..]), &[], 0), None);
    }
}
