//! Game lifecycle, pot aggregation and pari-mutuel payout arithmetic.

pub mod payout;
pub mod pot;
pub mod state;
pub mod types;
