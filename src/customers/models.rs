use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
}
