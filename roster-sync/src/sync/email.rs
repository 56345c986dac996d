//! Email normalization, validation and the subscriber content address

use md5::{Digest, Md5};
use once_cell::sync::Lazy;
use regex::Regex;

/// Local part: dot-separated atoms without specials, or a quoted string.
/// Domain: bracketed IPv4, or dotted labels ending in a 2+ letter TLD.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is valid")
});

/// Lowercase and trim
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}

/// Mailchimp member id: hex MD5 of the normalized address
pub fn subscriber_hash(email: &str) -> String {
    let digest = Md5::digest(normalize_email(email).as_bytes());
    hex::encode(digest)
}
