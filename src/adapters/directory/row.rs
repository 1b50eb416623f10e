//! Wire shape of a member row, shared by the REST and file directories.

use crate::domain::{MemberRecord, Role};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Every field is nullable on the wire.
#[derive(Debug, Deserialize)]
pub struct MemberRow {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub certification_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_rank")]
    pub rank: Option<i64>,
}

/// Integer, float, or numeric string. Floats are floored, which keeps
/// `rank >= threshold` unchanged for integer thresholds. Anything else
/// counts as unranked instead of failing the whole read.
fn lenient_rank<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(float_rank)),
        Some(Value::String(t)) => {
            let t = t.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().and_then(float_rank))
        }
        _ => None,
    })
}

fn float_rank(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.floor() as i64)
}

impl From<MemberRow> for MemberRecord {
    fn from(row: MemberRow) -> Self {
        MemberRecord {
            email: row.email.unwrap_or_default(),
            role: Role::from_directory(row.role.as_deref()),
            certification_tier: row.certification_level,
            rank: row.rank,
        }
    }
}

/// Decode a JSON array of rows.
pub fn parse_rows(json: &str) -> Result<Vec<MemberRecord>, serde_json::Error> {
    let rows: Vec<MemberRow> = serde_json::from_str(json)?;
    Ok(rows.into_iter().map(MemberRecord::from).collect())
}
