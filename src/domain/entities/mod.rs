//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping with lifecycle flags
//! - [`LinkHistoryEntry`] - Append-only pre-update snapshot of a link
//! - [`User`] / [`UserAuth`] - A registered user and their credential
//! - [`UserSession`] - An issued session credential
//!
//! # Design Pattern
//!
//! Entities are plain data; creation inputs use separate structs
//! (`NewLink`, `LinkUpdate`) so repositories never receive half-built rows.

pub mod link;
pub mod session;
pub mod user;

pub use link::{Link, LinkHistoryEntry, LinkUpdate, NewLink};
pub use session::UserSession;
pub use user::{PROVIDER_GOOGLE, PROVIDER_PASSWORD, User, UserAuth};
