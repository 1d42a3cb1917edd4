//! Chat handlers - private sessions and group mediation.

mod group;
mod private;
mod response;

pub use group::{display_name, handle_group_message, mentions_handle, record_and_analyze};
pub use private::{PrivateOutcome, exchange, handle_private_message, respond_in_session};
pub use response::{DISCORD_MESSAGE_LIMIT, split_message};
