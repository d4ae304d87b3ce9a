//! Driving port for serving stored receipt images.

use async_trait::async_trait;

use crate::domain::{Error, ImagePayload, StoreKey};

/// Read-only access to draft and permanent receipt images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageLibrary: Send + Sync {
    /// Decode the image stored under `key`.
    ///
    /// Keys outside the draft and permanent image families are reported as
    /// `NotFound`. A stored value that is not a base64 data URL fails with
    /// `InternalError`.
    async fn serve(&self, key: &StoreKey) -> Result<ImagePayload, Error>;
}
