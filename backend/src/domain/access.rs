//! Shared-secret gate in front of the history index.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::Error;

const FINGERPRINT_BYTES: usize = 8;

/// Checks the history password supplied with each audit request.
///
/// Fails closed: without a configured secret every check is rejected as a
/// server misconfiguration rather than an authentication failure.
///
/// # Examples
/// ```
/// use routeslip::domain::{AccessGate, ErrorCode};
///
/// let gate = AccessGate::new(Some("letmein".to_owned()));
/// assert!(gate.verify("letmein").is_ok());
/// assert_eq!(
///     gate.verify("nope").expect_err("mismatch").code(),
///     ErrorCode::Unauthorized
/// );
///
/// let closed = AccessGate::new(None);
/// assert_eq!(
///     closed.verify("letmein").expect_err("unset").code(),
///     ErrorCode::Misconfigured
/// );
/// ```
#[derive(Clone)]
pub struct AccessGate {
    secret: Option<Zeroizing<String>>,
}

impl AccessGate {
    /// Build a gate. Empty secrets are treated as unset.
    #[must_use]
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(Zeroizing::new),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Compare `password` with the configured secret.
    pub fn verify(&self, password: &str) -> Result<(), Error> {
        let Some(secret) = self.secret.as_ref() else {
            return Err(Error::misconfigured("history password is not configured"));
        };
        if secret.as_str() == password {
            Ok(())
        } else {
            Err(Error::unauthorized("incorrect history password"))
        }
    }

    /// Truncated SHA-256 fingerprint of the secret, for startup logs.
    #[must_use]
    pub fn fingerprint(&self) -> Option<String> {
        self.secret.as_ref().map(|secret| {
            let digest = Sha256::digest(secret.as_bytes());
            hex::encode(&digest[..FINGERPRINT_BYTES])
        })
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("letmein ")]
    #[case("LETMEIN")]
    fn rejects_anything_but_the_secret(#[case] attempt: &str) {
        let gate = AccessGate::new(Some("letmein".to_owned()));
        let err = gate.verify(attempt).expect_err("mismatch");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    fn unset_secret_fails_closed(#[case] secret: Option<String>) {
        let gate = AccessGate::new(secret);
        assert!(!gate.is_configured());
        assert_eq!(
            gate.verify("").expect_err("unset").code(),
            ErrorCode::Misconfigured
        );
        assert!(gate.fingerprint().is_none());
    }

    #[rstest]
    fn fingerprint_is_short_hex_and_stable() {
        let gate = AccessGate::new(Some("letmein".to_owned()));
        let first = gate.fingerprint().expect("fingerprint");
        assert_eq!(first.len(), FINGERPRINT_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(gate.fingerprint(), Some(first));
    }

    #[rstest]
    fn debug_never_prints_the_secret() {
        let gate = AccessGate::new(Some("letmein".to_owned()));
        assert!(!format!("{gate:?}").contains("letmein"));
    }
}
