//! Flat request parameter parsing.

use std::collections::HashMap;

/// Parse an `application/x-www-form-urlencoded` query string.
///
/// A leading `?` is ignored, `+` decodes to a space, and later duplicates win.
/// Pairs that are not valid percent-encoded UTF-8 are dropped.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key)?;
            let value = decode_component(value)?;
            Some((key, value))
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(e) => {
            tracing::debug!(component = raw, error = %e, "dropping undecodable query parameter");
            None
        }
    }
}
