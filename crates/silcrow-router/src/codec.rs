/// Percent-encoding for plural elements
///
/// Plural values are joined with `&`, so each element is escaped on the way
/// out and unescaped on the way in. Singular values never pass through here.
use crate::value::Scalar;

/// Percent-encodes one element for a `&`-joined list
///
/// # Examples
///
/// ```
/// use silcrow_router::codec::encode_element;
/// use silcrow_router::Scalar;
///
/// assert_eq!(encode_element(&Scalar::from("a&b")), "a%26b");
/// assert_eq!(encode_element(&Scalar::Int(42)), "42");
/// ```
pub fn encode_element(value: &Scalar) -> String {
    match value {
        Scalar::Int(n) => n.to_string(),
        Scalar::Str(s) => urlencoding::encode(s).into_owned(),
    }
}

/// Percent-decodes one captured element
///
/// Sequences that decode to invalid UTF-8 are replaced lossily instead of
/// rejecting the whole path.
pub fn decode_element(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned(),
    }
}
