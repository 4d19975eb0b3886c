//! Protocol types and the packed winner-claim message.

mod message;
mod types;

pub use message::{WinnerClaim, PACKED_LEN};
pub use types::GameId;
