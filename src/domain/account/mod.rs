//! Account aggregate - the authoritative record for one payer.

mod aggregate;
mod events;
mod status;

pub use aggregate::{Account, DecisionSource};
pub use events::AccountEvent;
pub use status::PaymentStatus;
