use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: i32,
    pub church_id: i32,
    pub name: String,
    /// Free-form type such as `small_group`, `ministry` or `class`.
    pub group_type: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewGroup {
    pub church_id: i32,
    pub name: String,
    pub group_type: String,
    pub status: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateGroup {
    pub name: String,
    pub group_type: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GroupMember {
    pub group_id: i32,
    pub contact_id: i32,
    pub role: String,
    pub joined_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewGroupMember {
    pub group_id: i32,
    pub contact_id: i32,
    pub role: String,
}
