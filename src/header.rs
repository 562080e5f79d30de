//! `Authorization: OAuth ...` rendering (RFC 5849 §3.5.1).

use std::collections::BTreeMap;

use crate::encoding::{percent_encode, StringEncoding};
use crate::{SignResult, OAUTH_KEY_PREFIX, REALM_KEY};

const OAUTH_SCHEME: &str = "OAuth";

/// Render the header value for an already signed parameter set.
///
/// `realm` comes first and is only quote-escaped; every other value is
/// percent-encoded. Only `oauth_` parameters are emitted, in name order.
pub fn render_authorization(
    realm: Option<&str>,
    oauth_parameters: &BTreeMap<String, String>,
    encoding: StringEncoding,
) -> SignResult<String> {
    let mut items = Vec::with_capacity(oauth_parameters.len() + 1);
    if let Some(realm) = realm {
        items.push(format!("{}=\"{}\"", REALM_KEY, escape_quoted(realm)));
    }
    for (key, value) in oauth_parameters
        .iter()
        .filter(|(key, _)| key.starts_with(OAUTH_KEY_PREFIX))
    {
        items.push(format!(
            "{}=\"{}\"",
            percent_encode(key, encoding)?,
            percent_encode(value, encoding)?
        ));
    }

    Ok(format!("{} {}", OAUTH_SCHEME, items.join(", ")))
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn realm_comes_first() {
        let header = render_authorization(
            Some("api"),
            &params(&[("oauth_version", "1.0"), ("oauth_consumer_key", "abcd")]),
            StringEncoding::Utf8,
        )
        .unwrap();
        assert_eq!(
            header,
            r#"OAuth realm="api", oauth_consumer_key="abcd", oauth_version="1.0""#
        );
    }

    #[test]
    fn values_are_percent_encoded() {
        let header = render_authorization(
            None,
            &params(&[("oauth_signature", "MdpQcU8iPSUjWoN/UDMsK2sui9I=")]),
            StringEncoding::Utf8,
        )
        .unwrap();
        assert_eq!(
            header,
            r#"OAuth oauth_signature="MdpQcU8iPSUjWoN%2FUDMsK2sui9I%3D""#
        );
    }

    #[test]
    fn non_oauth_parameters_are_skipped() {
        let header = render_authorization(
            Some("api"),
            &params(&[
                ("session_handle", "sh"),
                ("oauth_token", "tk"),
                ("oauth_session_handle", "osh"),
            ]),
            StringEncoding::Utf8,
        )
        .unwrap();
        assert_eq!(
            header,
            r#"OAuth realm="api", oauth_session_handle="osh", oauth_token="tk""#
        );
    }

    #[test]
    fn realm_is_escaped_not_encoded() {
        let header = render_authorization(
            Some(r#"my "photo" realm"#),
            &BTreeMap::new(),
            StringEncoding::Utf8,
        )
        .unwrap();
        assert_eq!(header, r#"OAuth realm="my \"photo\" realm""#);
    }
}
