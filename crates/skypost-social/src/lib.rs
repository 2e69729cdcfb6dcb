//! Publishing for skypost
//!
//! Posts report text to X (Twitter) with OAuth 1.0a user-context signing.

pub mod client;
pub mod error;
pub mod oauth;

pub use client::{PostReceipt, Publisher, XClient, X_API_URL};
pub use error::PostError;
pub use oauth::{OAuthCredentials, OAuthSigner};
