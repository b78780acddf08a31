use crate::gateway::GatewayError;
use crate::types::BlockHash;
use thiserror::Error;

/// Failures that prevent a block from being assembled at all
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("Block {0} not found")]
    BlockNotFound(BlockHash),

    #[error("Failed to fetch {context} for block {hash}")]
    UpstreamUnavailable {
        context: &'static str,
        hash: BlockHash,
        #[source]
        source: GatewayError,
    },

    #[error("Inconsistent data for block {hash}: {reason}")]
    UpstreamInconsistency { hash: BlockHash, reason: String },
}

impl AssembleError {
    pub(crate) fn unavailable(
        context: &'static str,
        hash: BlockHash,
    ) -> impl FnOnce(GatewayError) -> Self {
        move |source| Self::UpstreamUnavailable {
            context,
            hash,
            source,
        }
    }
}
