//! Business logic services.

#![allow(missing_docs)]

pub mod actor;
pub mod appeal;
pub mod audit;
pub mod authorizer;
pub mod clan;
pub mod join_request;
pub mod membership;
pub mod moderation;

pub use actor::Actor;
pub use appeal::{
    AppealService, ReviewAppealInput, SubmitAppealInput, check_appeal_eligibility,
};
pub use audit::{AuditEvent, AuditSink, NoOpAuditSink};
pub use authorizer::{ClanRole, StaffAction, StaffActionRequest, authorize};
pub use clan::{ClanService, CreateClanInput, UpdateClanInput};
pub use join_request::{JoinRequestService, RejectJoinRequestInput};
pub use membership::MembershipService;
pub use moderation::{ImposeBanInput, ModerationService};
