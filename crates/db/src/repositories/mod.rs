//! Repositories for database operations.

#![allow(missing_docs)]

pub mod audit_log;
pub mod candidate;
pub mod constituency;
pub mod party;
pub mod polling_station;
pub mod user;
pub mod vote_record;

pub use audit_log::AuditLogRepository;
pub use candidate::CandidateRepository;
pub use constituency::ConstituencyRepository;
pub use party::PartyRepository;
pub use polling_station::PollingStationRepository;
pub use user::UserRepository;
pub use vote_record::{CandidateVoteTotal, VoteRecordRepository};
