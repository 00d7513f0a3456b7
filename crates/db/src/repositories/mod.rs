//! Database repositories.

pub mod clan;
pub mod join_request;
pub mod suspension;
pub mod user;

pub use clan::ClanRepository;
pub use join_request::JoinRequestRepository;
pub use suspension::SuspensionRepository;
pub use user::UserRepository;
