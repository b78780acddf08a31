mod block_id;
mod get_block;
mod get_block_head;

pub use block_id::{BlockId, BlockIdParseError};
pub use get_block::{BlockQueryParams, GetBlockError, get_block};
pub use get_block_head::get_block_head;
