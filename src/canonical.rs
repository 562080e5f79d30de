//! Signature base string construction (RFC 5849 §3.4.1).

use log::debug;
use percent_encoding::percent_decode;
use url::Url;

use crate::encoding::{percent_encode, percent_encode_raw, StringEncoding};
use crate::{SignError, SignResult, OAUTH_SIGNATURE_KEY};

/// Normalize request parameters (RFC 5849 §3.4.1.3.2).
///
/// Every name and value is percent-encoded on its own, pairs are sorted by
/// encoded name and then by encoded value, and joined with `&`. Repeated
/// names each keep their own pair. `oauth_signature` never takes part.
pub fn normalize_parameters<I, K, V>(params: I, encoding: StringEncoding) -> SignResult<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Ok(join_encoded(encode_parameters(params, encoding)?))
}

/// Percent-encode each name and value under `encoding`.
pub(crate) fn encode_parameters<I, K, V>(
    params: I,
    encoding: StringEncoding,
) -> SignResult<Vec<(String, String)>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .into_iter()
        .map(|(k, v)| -> SignResult<(String, String)> {
            Ok((
                percent_encode(k.as_ref(), encoding)?,
                percent_encode(v.as_ref(), encoding)?,
            ))
        })
        .collect()
}

/// Sort and join pairs that are already percent-encoded.
pub(crate) fn join_encoded(mut pairs: Vec<(String, String)>) -> String {
    pairs.retain(|(k, _)| k != OAUTH_SIGNATURE_KEY);
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Base string URI (RFC 5849 §3.4.1.2): lower-case scheme and host, no
/// default port, no query, no fragment.
pub fn normalize_url(url: &Url) -> SignResult<String> {
    let scheme = url.scheme().to_ascii_lowercase();
    let host = url
        .host_str()
        .ok_or_else(|| SignError::InvalidUrl(format!("{} has no host", url)))?
        .to_ascii_lowercase();
    let port = match (scheme.as_str(), url.port()) {
        ("http", Some(80)) | ("https", Some(443)) | (_, None) => String::new(),
        (_, Some(port)) => format!(":{}", port),
    };

    Ok(format!("{}://{}{}{}", scheme, host, port, url.path()))
}

/// Query pairs of `url`, percent-encoded from the bytes on the wire.
pub fn query_parameters(url: &Url) -> Vec<(String, String)> {
    url.query()
        .map(|query| form_parameters(query.as_bytes()))
        .unwrap_or_default()
}

/// Pairs of an `application/x-www-form-urlencoded` payload, percent-encoded
/// from the decoded bytes. No charset conversion takes place, so the result
/// matches what the server receives whatever the bytes are.
pub fn form_parameters(input: &[u8]) -> Vec<(String, String)> {
    input
        .split(|&b| b == b'&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut split = pair.splitn(2, |&b| b == b'=');
            let name = split.next().unwrap_or_default();
            let value = split.next().unwrap_or_default();
            (reencode(name), reencode(value))
        })
        .collect()
}

fn reencode(raw: &[u8]) -> String {
    let plus_as_space: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    let decoded: Vec<u8> = percent_decode(&plus_as_space).collect();
    percent_encode_raw(&decoded)
}

/// `METHOD&encoded-url&encoded-parameters`.
pub fn signature_base_string(
    method: &str,
    normalized_url: &str,
    normalized_parameters: &str,
    encoding: StringEncoding,
) -> SignResult<String> {
    let base = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(normalized_url, encoding)?,
        percent_encode(normalized_parameters, encoding)?
    );
    debug!("signature base string: {}", base);
    Ok(base)
}
