//! Database entities.

pub mod audit_log;
pub mod candidate;
pub mod constituency;
pub mod party;
pub mod polling_station;
pub mod user;
pub mod vote_record;

pub use audit_log::Entity as AuditLog;
pub use candidate::Entity as Candidate;
pub use constituency::Entity as Constituency;
pub use party::Entity as Party;
pub use polling_station::Entity as PollingStation;
pub use user::Entity as User;
pub use vote_record::Entity as VoteRecord;
