//! HMAC-SHA512 webhook signature verification.
//!
//! Terraform Cloud signs both notification and run task deliveries with the
//! lowercase hex HMAC-SHA512 of the raw body, keyed with a shared salt. The
//! two delivery kinds use different headers, and the header that matched
//! decides which handler the event is routed to.
//!
//! The hash is computed once per event. Each candidate header is compared in
//! constant time, notification header first.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use crate::{InboundEvent, SecretValue, StateSaveError};

type HmacSha512 = Hmac<Sha512>;

/// Header carrying the signature of a notification delivery.
pub const NOTIFICATION_SIGNATURE_HEADER: &str = "X-Tfe-Notification-Signature";

/// Header carrying the signature of a run task delivery.
pub const TASK_SIGNATURE_HEADER: &str = "X-Tfc-Task-Signature";

/// Which trust domain a verified event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// Matched [`NOTIFICATION_SIGNATURE_HEADER`].
    Notification,
    /// Matched [`TASK_SIGNATURE_HEADER`].
    RunTask,
}

impl std::fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notification => f.write_str("notification"),
            Self::RunTask => f.write_str("run_task"),
        }
    }
}

/// Computes the lowercase hex HMAC-SHA512 of `body` keyed with `salt`.
pub fn compute_signature(salt: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(salt).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies `event` against both signature headers.
///
/// # Errors
///
/// Returns [`StateSaveError::Authentication`] when neither header is present
/// with a matching value.
pub fn verify(salt: &SecretValue, event: &InboundEvent) -> Result<SignatureKind, StateSaveError> {
    let expected = compute_signature(salt.as_bytes(), event.body());

    let candidates = [
        (NOTIFICATION_SIGNATURE_HEADER, SignatureKind::Notification),
        (TASK_SIGNATURE_HEADER, SignatureKind::RunTask),
    ];
    for (header, kind) in candidates {
        if let Some(provided) = event.header(header) {
            if signatures_match(&expected, provided) {
                return Ok(kind);
            }
        }
    }

    Err(StateSaveError::Authentication)
}

fn signatures_match(expected: &str, provided: &str) -> bool {
    // Length is not secret: every valid signature is 128 hex characters.
    expected.len() == provided.len() && bool::from(expected.as_bytes().ct_eq(provided.as_bytes()))
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
