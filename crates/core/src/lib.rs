//! Core business logic for clanhub.
//!
//! Moderation and authorization engine for clan communities: platform
//! bans with an appeal workflow, a ranked staff hierarchy inside each
//! clan, and the join request gate through which outside users become
//! members.

pub mod services;

pub use services::*;
