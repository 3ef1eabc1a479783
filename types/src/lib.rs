//! Fundamental types for the guildhall DAO.
//!
//! All economic values are fixed-point integers (u128) — no floating point
//! anywhere in the accounting path. Time is Unix seconds, bucketed into
//! fixed-length periods starting at the summoning time.

pub mod address;
pub mod amount;
pub mod config;
pub mod error;
pub mod period;
pub mod time;

pub use address::Address;
pub use amount::TokenAmount;
pub use config::GuildConfig;
pub use error::ConfigError;
pub use period::PeriodClock;
pub use time::Timestamp;
