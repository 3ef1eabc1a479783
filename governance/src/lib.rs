//! Member-governed treasury engine.
//!
//! Membership is dual-class: shares carry votes and an economic claim, loot
//! carries the claim alone. Funding and token-whitelist decisions move
//! through a sponsored proposal queue with fixed voting and grace windows;
//! any member may exit at any time by ragequitting into a proportional cut
//! of the treasury.

pub mod engine;
pub mod error;
pub mod member;
pub mod proposal;
pub mod ragequit;

pub use engine::GuildEngine;
pub use error::GovernanceError;
pub use member::{Member, MemberRegistry};
pub use proposal::{Proposal, ProposalKind, ProposalPhase, ProposalStatus, Vote};
pub use ragequit::fair_share;
