//! Daily quota rows.

use gitscribe_core::types::{CalendarDay, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// One identity's generation counter for one calendar day.
///
/// Exactly one of `user_id` and `ip_address` is set (CHECK-enforced).
/// Rows are never deleted; a day rollover simply starts a new row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct GenerationLimit {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub count: i32,
    pub date: CalendarDay,
}
