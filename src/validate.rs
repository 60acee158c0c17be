// src/validate.rs
//! Input-shape contracts for the lookup endpoints. Nothing here talks
//! to the network; rejected input never reaches the probing logic.

use crate::types::TrackerError;
use regex::Regex;
use std::net::Ipv4Addr;

pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_PHONE_LEN: usize = 20;

/// Alphanumeric plus `. _ -`, at most 50 characters.
pub fn username(raw: &str) -> Result<String, TrackerError> {
    let username = raw.trim();

    if username.is_empty() {
        return Err(TrackerError::InvalidInput(
            "Username must not be empty".to_string(),
        ));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(TrackerError::InvalidInput(
            "Username is too long".to_string(),
        ));
    }

    let re = Regex::new(r"^[a-zA-Z0-9._-]+$")
        .map_err(|e| TrackerError::ParseError(format!("Regex error: {}", e)))?;
    if !re.is_match(username) {
        return Err(TrackerError::InvalidInput(
            "Username may only contain letters, digits, underscores, hyphens and dots".to_string(),
        ));
    }

    Ok(username.to_string())
}

/// Public dotted-quad IPv4 address. Private, loopback, unspecified and
/// multicast/reserved ranges are rejected so the service cannot be used
/// to poke at internal infrastructure.
pub fn ip_address(raw: &str) -> Result<String, TrackerError> {
    let ip = raw.trim();

    if ip.is_empty() {
        return Err(TrackerError::InvalidInput(
            "IP address must not be empty".to_string(),
        ));
    }

    let parsed: Ipv4Addr = ip
        .parse()
        .map_err(|_| TrackerError::InvalidInput("Invalid IPv4 address format".to_string()))?;

    let octets = parsed.octets();
    let non_queryable = parsed.is_private()
        || parsed.is_loopback()
        || parsed.is_unspecified()
        || octets[0] == 0
        || octets[0] >= 224;

    if non_queryable {
        return Err(TrackerError::InvalidInput(
            "Private, loopback and reserved IP addresses cannot be queried".to_string(),
        ));
    }

    Ok(ip.to_string())
}

/// International phone shape: `+`, a non-zero digit, up to 14 more digits.
pub fn phone_number(raw: &str) -> Result<String, TrackerError> {
    let phone = raw.trim();

    if phone.is_empty() {
        return Err(TrackerError::InvalidInput(
            "Phone number must not be empty".to_string(),
        ));
    }
    if phone.len() > MAX_PHONE_LEN {
        return Err(TrackerError::InvalidInput(
            "Phone number is too long".to_string(),
        ));
    }

    let re = Regex::new(r"^\+[1-9]\d{1,14}$")
        .map_err(|e| TrackerError::ParseError(format!("Regex error: {}", e)))?;
    if !re.is_match(phone) {
        return Err(TrackerError::InvalidInput(
            "Phone number must use international format (leading +)".to_string(),
        ));
    }

    Ok(phone.to_string())
}
