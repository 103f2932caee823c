use serde::{Deserialize, Serialize};

/// One row of the player value table.
///
/// `month` is kept as the raw timestamp text; it is truncated to a calendar
/// month only when records are aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub user_id: String,
    pub player_value: f64,
    pub month: String,
}

impl Record {
    pub fn new(user_id: impl Into<String>, player_value: f64, month: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            player_value,
            month: month.into(),
        }
    }
}
