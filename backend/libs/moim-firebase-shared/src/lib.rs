/// Moim Firebase Shared Library
///
/// Server-side access to Firebase Authentication for the Moim admin tooling.
///
/// It handles:
/// - Service account resolution from discrete env values or a JSON blob
/// - OAuth2 access tokens via the JWT-bearer grant, cached until expiry
/// - Identity Toolkit calls: ID token lookup, lookup by email, account deletion

pub mod credentials;
pub mod errors;
pub mod identity;
pub mod models;
pub mod token;

pub use credentials::ServiceAccountConfig;
pub use errors::FirebaseError;
pub use identity::{IdentityToolkitClient, DEFAULT_IDENTITY_TOOLKIT_URL};
pub use models::ServiceAccountKey;
pub use token::{TokenMinter, DEFAULT_TOKEN_URI};
