use crate::{Error, Result};

const BVID_LEN: usize = 12;

/// A user-supplied video identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaId {
    Bvid(String),
    Aid(i64),
}

impl MediaId {
    /// Accepts `BV1xx411c7mD`, `av170001`, `170001` and video URLs
    /// containing either form.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if let Some(bvid) = find_bvid(input) {
            return Ok(Self::Bvid(bvid));
        }
        if let Ok(aid) = input.parse::<i64>() {
            if aid > 0 {
                return Ok(Self::Aid(aid));
            }
        }
        if let Some(aid) = find_aid(input) {
            return Ok(Self::Aid(aid));
        }

        Err(Error::InvalidMediaId(input.to_string()))
    }

    /// Query parameter the view endpoint expects for this id.
    pub fn query_pair(&self) -> (&'static str, String) {
        match self {
            Self::Bvid(bvid) => ("bvid", bvid.clone()),
            Self::Aid(aid) => ("aid", aid.to_string()),
        }
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bvid(bvid) => f.write_str(bvid),
            Self::Aid(aid) => write!(f, "av{aid}"),
        }
    }
}

fn find_bvid(input: &str) -> Option<String> {
    let lower = input.to_ascii_lowercase();
    lower.match_indices("bv").find_map(|(pos, _)| {
        let candidate: String = input[pos..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        (candidate.len() == BVID_LEN).then(|| format!("BV{}", &candidate[2..]))
    })
}

fn find_aid(input: &str) -> Option<i64> {
    let lower = input.to_ascii_lowercase();
    lower.match_indices("av").find_map(|(pos, _)| {
        let digits: String = lower[pos + 2..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok().filter(|aid| *aid > 0)
    })
}
