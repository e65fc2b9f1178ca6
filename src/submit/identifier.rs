// src/submit/identifier.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{BatchsubError, Result};

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));

/// Take the first run of ASCII digits in the submit program's output as the
/// job identifier, verbatim (leading zeros kept).
///
/// `"13579.server1\n"` yields `"13579"`.
pub fn extract_job_id(output: &str) -> Result<String> {
    DIGITS
        .find(output)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| BatchsubError::IdentifierParse(output.trim_end().to_string()))
}
