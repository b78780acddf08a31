//! The block enrichment pipeline.
//!
//! [`assemble`] fetches a block with its events, validator set and type registry, decodes every
//! extrinsic into a call tree, attributes events by phase, reconstructs paid fees and resolves
//! the author.

mod assembler;
pub mod author;
mod builder;
mod call_tree;
mod error;
mod events;
pub mod fees;
mod types;

pub use assembler::assemble;
pub use call_tree::parse as parse_call;
pub use error::AssembleError;
pub use types::{
    Block, BlockOptions, CallArgs, DigestLog, Event, EventBucket, Extrinsic, ExtrinsicSuccess,
    FeeInfo, MethodName, SanitizedArg, SanitizedCall, Signature,
};
