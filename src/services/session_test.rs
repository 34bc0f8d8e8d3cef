use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_pads_low_nibbles() {
    assert_eq!(bytes_to_hex(&[0x0a, 0x00]), "0a00");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn session_user_serializes_null_optionals() {
    let user = SessionUser { id: Uuid::nil(), name: "mallory".into(), avatar_url: None, email: None };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["name"], "mallory");
    assert!(json["avatar_url"].is_null());
    assert!(json["email"].is_null());
}

#[test]
fn session_user_serializes_profile_fields() {
    let user = SessionUser {
        id: Uuid::nil(),
        name: "alice".into(),
        avatar_url: Some("https://example.com/a.png".into()),
        email: Some("alice@example.com".into()),
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["avatar_url"], "https://example.com/a.png");
    assert_eq!(json["email"], "alice@example.com");
}
