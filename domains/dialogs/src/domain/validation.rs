//! Identity key formats accepted by the API surfaces

use regex::Regex;

lazy_static::lazy_static! {
    /// UUID version 4, any letter case
    pub static ref UUIDV4_REGEX: Regex = Regex::new(
        r"(?i)^[a-f\d]{8}-[a-f\d]{4}-4[a-f\d]{3}-[89ab][a-f\d]{3}-[a-f\d]{12}$"
    )
    .unwrap();

    /// Lowercase UUID shape matched by public dialog routes
    pub static ref PEER_ID_REGEX: Regex =
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap();
}

/// Validate an identity key sent to the internal API
pub fn is_identity_key(value: &str) -> bool {
    UUIDV4_REGEX.is_match(value)
}

/// Validate the peer segment of a public dialog route
pub fn is_peer_id(value: &str) -> bool {
    PEER_ID_REGEX.is_match(value)
}
