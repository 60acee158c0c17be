// src/phone.rs
//! Telephony collaborator. Parsing and formatting are delegated
//! entirely to the `phonenumber` crate; this module only remaps its
//! output into our report shape. The crate ships no carrier, geocoder
//! or timezone metadata, so those fields are not reported.

use crate::types::TrackerError;
use phonenumber::{country, metadata, Mode, Type};
use serde::Serialize;

/// Region hint applied when the input carries no country prefix. Input
/// validation requires a leading `+`, so this is rarely consulted.
const DEFAULT_REGION: country::Id = country::Id::ID;

/// Normalized report for one phone number.
#[derive(Debug, Clone, Serialize)]
pub struct PhoneReport {
    pub phone_number: String,
    pub is_valid: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub region_code: Option<String>,
    pub country_code: u16,
    pub national_number: String,
    pub international_format: String,
    pub e164_format: String,
    pub national_format: String,
    pub rfc3966_format: String,
    pub success: bool,
}

/// Coarse number-type label for the line kind the numbering plan
/// assigns. NANP regions cannot distinguish fixed lines from mobiles,
/// so `fixed_line_or_mobile` is the common answer there.
fn describe_type(kind: Type) -> &'static str {
    match kind {
        Type::Mobile => "mobile",
        Type::FixedLine => "fixed_line",
        Type::FixedLineOrMobile => "fixed_line_or_mobile",
        Type::TollFree => "toll_free",
        Type::PremiumRate => "premium_rate",
        Type::Voip => "voip",
        _ => "unknown",
    }
}

/// Parses a validated phone string and remaps the library's fields.
pub fn lookup(phone: &str) -> Result<PhoneReport, TrackerError> {
    let number = phonenumber::parse(Some(DEFAULT_REGION), phone)
        .map_err(|e| TrackerError::InvalidInput(format!("Invalid phone number: {}", e)))?;

    let region_code = number.country().id().map(|id| format!("{:?}", id));

    Ok(PhoneReport {
        phone_number: phone.to_string(),
        is_valid: phonenumber::is_valid(&number),
        kind: describe_type(number.number_type(&metadata::DATABASE)).to_string(),
        region_code,
        country_code: number.country().code(),
        national_number: number.national().value().to_string(),
        international_format: number.format().mode(Mode::International).to_string(),
        e164_format: number.format().mode(Mode::E164).to_string(),
        national_format: number.format().mode(Mode::National).to_string(),
        rfc3966_format: number.format().mode(Mode::Rfc3966).to_string(),
        success: true,
    })
}
