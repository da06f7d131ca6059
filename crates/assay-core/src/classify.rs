//! Sample-identifier classification.
//!
//! A free-text sample identifier such as `"100000 V2 10"` carries up to
//! three facts: a patient id, a visit code, and a dilution factor. The
//! first whitespace token always seeds the patient id, even when it looks
//! like a visit or dilution token. Remaining tokens are scanned left to
//! right with strict precedence: visit pattern first, then dilution, and
//! only the first match of each kind counts. Tokens matching neither are
//! absorbed back into the patient id, which allows multi-word identifiers.

use crate::error::CoreError;

/// Sentinel visit value when no visit token is found.
pub const VISIT_NA: &str = "NA";

/// The structured fields of one sample identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    /// Never empty.
    pub patient_id: String,
    /// Upper-cased visit token, or `"NA"`.
    pub visit: String,
    /// Dilution factor, absent when no token matched.
    pub dilution: Option<u64>,
}

/// Classify one identifier string.
///
/// # Errors
///
/// `CoreError::MalformedIdentifier` when the input is empty after trimming.
pub fn classify(identifier: &str) -> Result<ParsedIdentifier, CoreError> {
    let mut tokens = identifier.split_whitespace();
    let first = tokens.next().ok_or(CoreError::MalformedIdentifier)?;

    let mut patient_id = first.to_string();
    let mut visit: Option<String> = None;
    let mut dilution: Option<u64> = None;

    for token in tokens {
        if visit.is_none() && is_visit_token(token) {
            visit = Some(token.to_ascii_uppercase());
        } else if dilution.is_none()
            && let Some(value) = parse_dilution_token(token)
        {
            dilution = Some(value);
        } else {
            patient_id.push(' ');
            patient_id.push_str(token);
        }
    }

    Ok(ParsedIdentifier {
        patient_id,
        visit: visit.unwrap_or_else(|| VISIT_NA.to_string()),
        dilution,
    })
}

/// A visit token is the letter V (either case) followed by one or more
/// digits and nothing else.
fn is_visit_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 2
        && (bytes[0] == b'V' || bytes[0] == b'v')
        && bytes[1..].iter().all(u8::is_ascii_digit)
}

/// A dilution token is a non-zero digit followed by one or more zeros and
/// nothing else: "10", "100", "1000" but never "20", "101", or "0".
/// A token too large for u64 is treated as not matching.
fn parse_dilution_token(token: &str) -> Option<u64> {
    let bytes = token.as_bytes();
    if bytes.len() < 2 || !bytes[0].is_ascii_digit() || bytes[0] == b'0' {
        return None;
    }
    if !bytes[1..].iter().all(|&b| b == b'0') {
        return None;
    }
    token.parse().ok()
}
