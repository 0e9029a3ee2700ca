//! Business logic services for the application layer.

pub mod link_service;
pub mod oauth_service;
pub mod redirect_service;
pub mod session_service;
pub mod user_service;

pub use link_service::LinkService;
pub use oauth_service::OAuthService;
pub use redirect_service::RedirectService;
pub use session_service::SessionService;
pub use user_service::{RegisterUser, UserService};
