use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters `encodeURIComponent` escapes: everything except ASCII
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode(tag: &str) -> String {
    utf8_percent_encode(tag, COMPONENT).to_string()
}

/// Decode a raw fragment (without the leading `#`). Sequences that do not
/// decode to UTF-8 yield `None`.
pub fn decode(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// Split an address bar value (`/browse/#go`) or a `#`-prefixed hash into
/// its fragment part. Anything else is already a fragment, so a bare `c#`
/// stays whole.
pub fn strip_hash(raw: &str) -> &str {
    match raw.split_once('#') {
        Some((before, frag)) if before.is_empty() || before.contains('/') => frag,
        _ => raw,
    }
}
