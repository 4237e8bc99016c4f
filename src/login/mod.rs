use async_trait::async_trait;

pub mod client;
pub mod probe;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The service answered but refused the login.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Something that can attempt a login.
/// The login probe only cares whether the attempt succeeded.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self) -> Result<(), AuthError>;
}
