use super::*;
use crate::HttpMethod;

const SALT: &str = "shared-salt";
const BODY: &[u8] = br#"{"payload_version":1,"notifications":[]}"#;

fn event_with(headers: Vec<(&str, String)>) -> InboundEvent {
    InboundEvent::new(HttpMethod::Post, headers, BODY.to_vec())
}

#[test]
fn test_compute_signature_matches_rfc4231_vector() {
    let sig = compute_signature(b"Jefe", b"what do ya want for nothing?");
    assert_eq!(
        sig,
        "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
         9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
    );
}

#[test]
fn test_compute_signature_is_deterministic_and_lowercase_hex() {
    let a = compute_signature(SALT.as_bytes(), BODY);
    let b = compute_signature(SALT.as_bytes(), BODY);

    assert_eq!(a, b);
    assert_eq!(a.len(), 128);
    assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn test_single_bit_flip_in_body_or_salt_changes_signature() {
    let original = compute_signature(SALT.as_bytes(), BODY);

    let mut body = BODY.to_vec();
    body[0] ^= 0x01;
    assert_ne!(compute_signature(SALT.as_bytes(), &body), original);

    let mut salt = SALT.as_bytes().to_vec();
    salt[0] ^= 0x01;
    assert_ne!(compute_signature(&salt, BODY), original);
}

#[test]
fn test_verify_accepts_notification_signature() {
    let sig = compute_signature(SALT.as_bytes(), BODY);
    let event = event_with(vec![(NOTIFICATION_SIGNATURE_HEADER, sig)]);

    let kind = verify(&SecretValue::new(SALT), &event).unwrap();
    assert_eq!(kind, SignatureKind::Notification);
}

#[test]
fn test_verify_accepts_task_signature() {
    let sig = compute_signature(SALT.as_bytes(), BODY);
    let event = event_with(vec![(TASK_SIGNATURE_HEADER, sig)]);

    let kind = verify(&SecretValue::new(SALT), &event).unwrap();
    assert_eq!(kind, SignatureKind::RunTask);
}

#[test]
fn test_verify_header_lookup_is_case_insensitive() {
    let sig = compute_signature(SALT.as_bytes(), BODY);
    let event = event_with(vec![("x-tfc-task-signature", sig)]);

    assert_eq!(
        verify(&SecretValue::new(SALT), &event).unwrap(),
        SignatureKind::RunTask
    );
}

#[test]
fn test_verify_checks_notification_header_first() {
    let sig = compute_signature(SALT.as_bytes(), BODY);
    let event = event_with(vec![
        (NOTIFICATION_SIGNATURE_HEADER, sig.clone()),
        (TASK_SIGNATURE_HEADER, sig),
    ]);

    assert_eq!(
        verify(&SecretValue::new(SALT), &event).unwrap(),
        SignatureKind::Notification
    );
}

#[test]
fn test_verify_falls_through_to_task_header_when_notification_header_is_wrong() {
    let sig = compute_signature(SALT.as_bytes(), BODY);
    let event = event_with(vec![
        (NOTIFICATION_SIGNATURE_HEADER, "00".repeat(64)),
        (TASK_SIGNATURE_HEADER, sig),
    ]);

    assert_eq!(
        verify(&SecretValue::new(SALT), &event).unwrap(),
        SignatureKind::RunTask
    );
}

#[test]
fn test_verify_rejects_wrong_salt() {
    let sig = compute_signature(b"other-salt", BODY);
    let event = event_with(vec![(NOTIFICATION_SIGNATURE_HEADER, sig)]);

    assert!(matches!(
        verify(&SecretValue::new(SALT), &event),
        Err(StateSaveError::Authentication)
    ));
}

#[test]
fn test_verify_rejects_uppercase_hex() {
    let sig = compute_signature(SALT.as_bytes(), BODY).to_ascii_uppercase();
    let event = event_with(vec![(NOTIFICATION_SIGNATURE_HEADER, sig)]);

    assert!(verify(&SecretValue::new(SALT), &event).is_err());
}

#[test]
fn test_verify_rejects_missing_headers() {
    let event = event_with(vec![]);
    assert!(matches!(
        verify(&SecretValue::new(SALT), &event),
        Err(StateSaveError::Authentication)
    ));
}

#[test]
fn test_authentication_error_does_not_leak_hash() {
    let event = event_with(vec![(NOTIFICATION_SIGNATURE_HEADER, "bad".to_string())]);
    let err = verify(&SecretValue::new(SALT), &event).unwrap_err();
    let expected = compute_signature(SALT.as_bytes(), BODY);

    let rendered = format!("{err} {err:?}");
    assert!(!rendered.contains(&expected));
    assert!(!rendered.contains(SALT));
    assert_eq!(err.to_string(), "Invalid HMAC signature");
}
