//! Destination number normalization.

use tracing::debug;
use vonage_mcp_provider::Result;

use crate::collaborators::NumberLookup;

/// Lookup status meaning the number was resolved.
const STATUS_SUCCESS: i64 = 0;

/// A phone number in canonical international format, as returned by the
/// provider's lookup.  Only [`normalize`] can produce one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormattedNumber(String);

impl FormattedNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(number: &str) -> Self {
        Self(number.to_owned())
    }
}

impl std::fmt::Display for FormattedNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve `raw` through the lookup service.
///
/// `Ok(None)` means the provider answered but could not resolve the number;
/// callers treat that as an invalid destination.  Transport and provider
/// failures are returned as errors.
pub async fn normalize(lookup: &dyn NumberLookup, raw: &str) -> Result<Option<FormattedNumber>> {
    let insight = lookup.basic_lookup(raw).await?;

    if insight.status != STATUS_SUCCESS {
        debug!(
            status = insight.status,
            status_message = ?insight.status_message,
            "number lookup did not resolve"
        );
        return Ok(None);
    }

    Ok(insight
        .international_format_number
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
        .map(FormattedNumber))
}
