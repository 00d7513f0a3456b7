//! Database entities.

pub mod appeal_record;
pub mod clan;
pub mod clan_member;
pub mod join_request;
pub mod staff_assignment;
pub mod suspension_record;
pub mod user;

pub use appeal_record::Entity as AppealRecord;
pub use clan::Entity as Clan;
pub use clan_member::Entity as ClanMember;
pub use join_request::Entity as JoinRequest;
pub use staff_assignment::Entity as StaffAssignment;
pub use suspension_record::Entity as SuspensionRecord;
pub use user::Entity as User;
