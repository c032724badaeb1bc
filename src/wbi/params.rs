use std::collections::BTreeMap;

use super::MixingKey;

/// Characters the platform strips from string values before signing.
const STRIPPED_CHARS: [char; 5] = ['!', '\'', '(', ')', '*'];

/// A query parameter value. Only strings are cleaned before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

impl ParamValue {
    fn cleaned(self) -> Self {
        match self {
            Self::Str(s) => Self::Str(strip_reserved(&s)),
            other => other,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// Parameters after signing: cleaned, key-sorted, with `wts` and `w_rid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParams {
    params: BTreeMap<String, ParamValue>,
    w_rid: String,
}

impl SignedParams {
    pub fn w_rid(&self) -> &str {
        &self.w_rid
    }

    pub fn wts(&self) -> Option<i64> {
        match self.params.get("wts") {
            Some(ParamValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// The exact query string to send: the digested part plus `w_rid`.
    pub fn to_query(&self) -> String {
        format!("{}&w_rid={}", canonical_query(&self.params), self.w_rid)
    }
}

/// Sign `params` at the given Unix timestamp.
pub fn sign(
    params: impl IntoIterator<Item = (String, ParamValue)>,
    key: &MixingKey,
    wts: i64,
) -> SignedParams {
    let mut params: BTreeMap<String, ParamValue> = params
        .into_iter()
        .map(|(k, v)| (k, v.cleaned()))
        .collect();
    params.insert("wts".to_string(), ParamValue::Int(wts));

    let query = canonical_query(&params);
    let digest = md5::compute(format!("{query}{}", key.as_str()));
    SignedParams {
        params,
        w_rid: hex::encode(digest.0),
    }
}

/// Sign `params` at the current wall-clock time.
pub fn sign_now(
    params: impl IntoIterator<Item = (String, ParamValue)>,
    key: &MixingKey,
) -> SignedParams {
    sign(params, key, chrono::Utc::now().timestamp())
}

fn strip_reserved(value: &str) -> String {
    value.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}

fn canonical_query(params: &BTreeMap<String, ParamValue>) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k),
                urlencoding::encode(&v.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
