//! Character encodings and the RFC 3986 percent-encoding used by OAuth 1.0.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use percent_encoding::{percent_encode as encode_bytes, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::{SignError, SignResult};

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The character set strings are converted into before they are
/// percent-encoded or fed into the HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum StringEncoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl StringEncoding {
    /// Canonical charset name.
    pub const fn name(&self) -> &'static str {
        match self {
            StringEncoding::Utf8 => "UTF-8",
            StringEncoding::Ascii => "US-ASCII",
            StringEncoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Convert `input` into bytes of this encoding.
    ///
    /// Fails with [`SignError::Encoding`] when a character has no
    /// representation in the target charset.
    pub fn encode<'a>(&self, input: &'a str) -> SignResult<Cow<'a, [u8]>> {
        match self {
            StringEncoding::Utf8 => Ok(Cow::Borrowed(input.as_bytes())),
            StringEncoding::Ascii if input.is_ascii() => Ok(Cow::Borrowed(input.as_bytes())),
            StringEncoding::Ascii => Err(self.unrepresentable(input)),
            StringEncoding::Latin1 => {
                if input.is_ascii() {
                    return Ok(Cow::Borrowed(input.as_bytes()));
                }
                input
                    .chars()
                    .map(|c| u8::try_from(u32::from(c)).map_err(|_| self.unrepresentable(input)))
                    .collect::<SignResult<Vec<u8>>>()
                    .map(Cow::Owned)
            }
        }
    }

    fn unrepresentable(&self, input: &str) -> SignError {
        SignError::Encoding {
            encoding: self.name(),
            input: input.to_string(),
        }
    }
}

impl fmt::Display for StringEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StringEncoding {
    type Err = SignError;

    fn from_str(s: &str) -> SignResult<Self> {
        match s.to_ascii_uppercase().replace('_', "-").as_str() {
            "UTF-8" | "UTF8" => Ok(StringEncoding::Utf8),
            "US-ASCII" | "ASCII" => Ok(StringEncoding::Ascii),
            "ISO-8859-1" | "LATIN1" | "LATIN-1" => Ok(StringEncoding::Latin1),
            _ => Err(SignError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for StringEncoding {
    type Error = SignError;

    fn try_from(value: String) -> SignResult<Self> {
        value.parse()
    }
}

/// Percent-encode `input` per RFC 5849 §3.6, leaving only the RFC 3986
/// unreserved set untouched.
pub fn percent_encode(input: &str, encoding: StringEncoding) -> SignResult<String> {
    let bytes = encoding.encode(input)?;
    Ok(percent_encode_raw(&bytes))
}

/// Percent-encode bytes that are already in their wire charset.
pub(crate) fn percent_encode_raw(bytes: &[u8]) -> String {
    encode_bytes(bytes, OAUTH_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;
    use pretty_assertions::assert_eq;

    fn utf8(input: &str) -> String {
        percent_encode(input, StringEncoding::Utf8).unwrap()
    }

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(utf8("abc123"), "abc123");
        assert_eq!(utf8("ABC"), "ABC");
        assert_eq!(utf8("-._~"), "-._~");
    }

    #[test]
    fn reserved_characters_are_encoded() {
        assert_eq!(utf8(" "), "%20");
        assert_eq!(utf8("&"), "%26");
        assert_eq!(utf8("="), "%3D");
        assert_eq!(utf8("/"), "%2F");
        assert_eq!(utf8("+"), "%2B");
        assert_eq!(utf8("*"), "%2A");
        assert_eq!(utf8("!"), "%21");
    }

    #[test]
    fn multibyte_characters_use_uppercase_hex() {
        assert_eq!(utf8("少女"), "%E5%B0%91%E5%A5%B3");
        assert_eq!(utf8("é"), "%C3%A9");
    }

    #[test]
    fn reserved_value_round_trips() {
        let value = "a b&c";
        let encoded = utf8(value);
        assert_eq!(encoded, "a%20b%26c");
        assert_eq!(percent_decode_str(&encoded).decode_utf8().unwrap(), value);
    }

    #[test]
    fn raw_bytes_skip_charset_conversion() {
        assert_eq!(percent_encode_raw(&[0xFF, b' ', b'a']), "%FF%20a");
        assert_eq!(percent_encode_raw("é".as_bytes()), utf8("é"));
    }

    #[test]
    fn latin1_encodes_single_bytes() {
        assert_eq!(
            percent_encode("sé", StringEncoding::Latin1).unwrap(),
            "s%E9"
        );
        assert!(matches!(
            percent_encode("少女", StringEncoding::Latin1),
            Err(SignError::Encoding {
                encoding: "ISO-8859-1",
                ..
            })
        ));
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        assert_eq!(
            percent_encode("plain", StringEncoding::Ascii).unwrap(),
            "plain"
        );
        assert_eq!(
            percent_encode("é", StringEncoding::Ascii),
            Err(SignError::Encoding {
                encoding: "US-ASCII",
                input: "é".to_string(),
            })
        );
    }

    #[test]
    fn parse_charset_names() {
        assert_eq!("utf-8".parse::<StringEncoding>(), Ok(StringEncoding::Utf8));
        assert_eq!("US-ASCII".parse::<StringEncoding>(), Ok(StringEncoding::Ascii));
        assert_eq!("iso_8859-1".parse::<StringEncoding>(), Ok(StringEncoding::Latin1));
        assert_eq!(
            "EBCDIC".parse::<StringEncoding>(),
            Err(SignError::UnsupportedEncoding("EBCDIC".to_string()))
        );
    }
}
