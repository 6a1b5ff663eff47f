pub mod email;
pub mod google_oauth;

pub use email::{EmailError, EmailService};
pub use google_oauth::{GoogleOAuthClient, OAuthError};
