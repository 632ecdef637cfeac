//! Ledger reconstruction: memo wire format, history scanning and the
//! per-user bet view derived from replaying it.

pub mod client;
pub mod derive;
pub mod memo;
pub mod reconstruct;
pub mod scanner;
