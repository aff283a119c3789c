//! Item reference as seen by the booking core

use sqlx::FromRow;

/// Read-only view of a listed item
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ItemRef {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub available: bool,
}

impl ItemRef {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}
