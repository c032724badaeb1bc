use crate::{Error, Result};

/// Position table applied to `img_key + sub_key`. Protocol constant.
const MIXIN_KEY_ENC_TAB: [usize; 64] = [
    46, 47, 18, 2, 53, 8, 23, 32, 15, 50, 10, 31, 58, 3, 45, 35, 27, 43, 5, 49, 33, 9, 42, 19, 29,
    28, 14, 39, 12, 38, 41, 13, 37, 48, 7, 16, 24, 55, 40, 61, 26, 17, 0, 1, 60, 51, 30, 4, 22, 25,
    54, 21, 56, 59, 6, 63, 57, 62, 11, 36, 20, 34, 44, 52,
];

const MIXIN_KEY_LEN: usize = 32;

/// The 32-character key appended to the canonical query before digesting.
#[derive(Clone, PartialEq, Eq)]
pub struct MixingKey(String);

impl std::fmt::Debug for MixingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MixingKey").field(&"[REDACTED]").finish()
    }
}

impl MixingKey {
    /// Derive the mixing key from the two published fragments.
    ///
    /// The concatenated fragments must cover every index of the position
    /// table (64 bytes); the published fragments are 32 bytes each.
    pub fn derive(img_key: &str, sub_key: &str) -> Result<Self> {
        let raw = format!("{img_key}{sub_key}");
        if !raw.is_ascii() {
            return Err(Error::InvalidKeyMaterial(
                "key fragments must be ASCII".to_string(),
            ));
        }
        let bytes = raw.as_bytes();
        if bytes.len() < MIXIN_KEY_ENC_TAB.len() {
            return Err(Error::InvalidKeyMaterial(format!(
                "combined fragments are {} bytes, need at least {}",
                bytes.len(),
                MIXIN_KEY_ENC_TAB.len()
            )));
        }

        let mixed = MIXIN_KEY_ENC_TAB
            .iter()
            .take(MIXIN_KEY_LEN)
            .map(|&index| char::from(bytes[index]))
            .collect();
        Ok(Self(mixed))
    }

    /// Wrap an already mixed key, e.g. one cached from an earlier run.
    pub fn from_mixed(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
