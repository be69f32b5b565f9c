use serde::Deserialize;
use validator::Validate;

use crate::domain::group::{NewGroup, NewGroupMember, UpdateGroup};

#[derive(Deserialize, Validate)]
pub struct AddGroupForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub group_type: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

impl AddGroupForm {
    pub fn into_domain(self, church_id: i32) -> NewGroup {
        NewGroup {
            church_id,
            name: self.name,
            group_type: self.group_type,
            status: self.status,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct SaveGroupForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub group_type: String,
    pub status: String,
}

impl From<SaveGroupForm> for UpdateGroup {
    fn from(form: SaveGroupForm) -> Self {
        UpdateGroup {
            name: form.name,
            group_type: form.group_type,
            status: form.status,
        }
    }
}

#[derive(Deserialize)]
pub struct AddGroupMemberForm {
    pub contact_id: i32,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "member".to_string()
}

impl AddGroupMemberForm {
    pub fn into_domain(self, group_id: i32) -> NewGroupMember {
        NewGroupMember {
            group_id,
            contact_id: self.contact_id,
            role: self.role,
        }
    }
}
