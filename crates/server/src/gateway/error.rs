use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("RPC call '{method}' failed")]
    Rpc {
        method: &'static str,
        #[source]
        source: subxt_rpcs::Error,
    },

    #[error("Invalid hex in '{field}': {source}")]
    Hex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("Failed to SCALE decode {what}: {source}")]
    Codec {
        what: &'static str,
        #[source]
        source: parity_scale_codec::Error,
    },

    #[error("Failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Unsupported metadata version V{0}, expected V9 to V15")]
    UnsupportedMetadata(u32),

    #[error("Block {0} not found")]
    BlockNotFound(String),
}

impl GatewayError {
    pub(crate) fn rpc(method: &'static str) -> impl FnOnce(subxt_rpcs::Error) -> Self {
        move |source| Self::Rpc { method, source }
    }

    pub(crate) fn hex(field: &'static str) -> impl FnOnce(hex::FromHexError) -> Self {
        move |source| Self::Hex { field, source }
    }

    pub(crate) fn codec(what: &'static str) -> impl FnOnce(parity_scale_codec::Error) -> Self {
        move |source| Self::Codec { what, source }
    }
}
