//! Business logic services.

#![allow(missing_docs)]

pub mod aggregation;
pub mod auth;
pub mod candidate;
pub mod constituency;
pub mod event_publisher;
pub mod party;
pub mod polling_station;
pub mod region;
pub mod result;
pub mod user;

pub use aggregation::{
    AggregationScope, AggregationService, AggregationSnapshot, CandidateStanding,
    ConstituencyBreakdown, ConstituencyResults, NationalStats, PresidentialResults, RegionResults,
};
pub use auth::{AuthClaims, AuthService, LoginInput, RegisterInput, TokenResponse};
pub use candidate::{CandidateService, CreateCandidateInput};
pub use constituency::{ConstituencyService, CreateConstituencyInput};
pub use event_publisher::{
    NoOpResultPublisher, ResultChange, ResultEventPublisher, ResultPublisherService,
};
pub use party::{CreatePartyInput, PartyService};
pub use polling_station::{CreatePollingStationInput, PollingStationService};
pub use region::{RegionDetail, RegionOverview, RegionService};
pub use result::{ResultService, SubmitResultInput, UpdateResultInput};
pub use user::{CreateUserInput, UpdateUserInput, UserService};
