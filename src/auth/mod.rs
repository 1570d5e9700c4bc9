pub mod authorizor;
mod platform;
mod user;

use async_trait::async_trait;

use crate::error::Error;

pub use platform::Platform;
pub use user::User;

/// Seam for the external session/identity collaborator. Credential format
/// and issuance live outside this service; the engine only needs the
/// mapping from an opaque credential to a user identity.
#[async_trait]
pub trait Authenticator {
    async fn authenticate(&self, credential: &str) -> Result<User, Error>;
}
