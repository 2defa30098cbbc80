use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

use crate::errors::SiteError;

/// Decode a form-url-encoded payload into its field map.
///
/// The whole payload is rejected when any `&`-separated segment lacks a `=`;
/// there is no partial acceptance. Duplicate field names keep the last value.
pub fn decode_form(raw: &[u8]) -> Result<BTreeMap<String, String>, SiteError> {
    let text = std::str::from_utf8(raw).map_err(|e| SiteError::Payload {
        reason: format!("payload is not UTF-8: {e}"),
    })?;

    // `+` means space only outside percent escapes, so it is replaced before
    // decoding; `%2B` still comes out as a literal plus.
    let decoded = percent_decode_str(&text.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned();

    let mut fields = BTreeMap::new();

    for segment in decoded.split('&') {
        let (key, value) = segment.split_once('=').ok_or_else(|| SiteError::Payload {
            reason: format!("segment {segment:?} has no `=`"),
        })?;

        fields.insert(key.to_string(), value.to_string());
    }

    Ok(fields)
}
