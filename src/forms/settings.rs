//! Payloads for the custom-field and notification settings pages.

use serde::Deserialize;
use validator::Validate;

use crate::domain::custom_field::{FieldType, NewCustomField};
use crate::domain::notification::{GlobalSettings, NewTypeSetting, NotificationMethod};
use crate::domain::types::NonEmptyString;

#[derive(Deserialize, Validate)]
pub struct AddCustomFieldForm {
    #[validate(length(min = 1))]
    pub entity: String,
    #[validate(length(min = 1))]
    pub field_name: String,
    #[validate(length(min = 1))]
    pub field_label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub position: i32,
}

fn default_visible() -> bool {
    true
}

impl AddCustomFieldForm {
    pub fn into_domain(self, church_id: i32) -> NewCustomField {
        NewCustomField {
            church_id,
            entity: self.entity,
            field_name: self.field_name,
            field_label: self.field_label,
            field_type: self.field_type,
            options: self
                .options
                .into_iter()
                .filter_map(|o| NonEmptyString::new(o).ok())
                .map(NonEmptyString::into_inner)
                .collect(),
            required: self.required,
            visible: self.visible,
            position: self.position,
        }
    }
}

#[derive(Deserialize)]
pub struct CustomFieldListParams {
    pub entity: Option<String>,
}

#[derive(Deserialize)]
pub struct GlobalSettingsForm {
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub sms_enabled: bool,
    pub in_app_enabled: bool,
}

impl GlobalSettingsForm {
    pub fn into_domain(self, church_id: i32) -> GlobalSettings {
        GlobalSettings {
            church_id,
            email_enabled: self.email_enabled,
            push_enabled: self.push_enabled,
            sms_enabled: self.sms_enabled,
            in_app_enabled: self.in_app_enabled,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct TypeSettingForm {
    #[validate(length(min = 1))]
    pub notification_type: String,
    pub method: NotificationMethod,
    pub enabled: bool,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl TypeSettingForm {
    pub fn into_domain(self, church_id: i32) -> NewTypeSetting {
        NewTypeSetting {
            church_id,
            notification_type: self.notification_type,
            method: self.method,
            enabled: self.enabled,
            roles: self.roles,
        }
    }
}

/// Both halves of the notification settings page in one save.
#[derive(Deserialize, Validate)]
pub struct NotificationSettingsForm {
    pub global: GlobalSettingsForm,
    #[serde(default)]
    #[validate(nested)]
    pub types: Vec<TypeSettingForm>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TypeConstraintError;

    #[test]
    fn dropdown_without_options_fails_domain_validation() {
        let form = AddCustomFieldForm {
            entity: "contacts".to_string(),
            field_name: "size".to_string(),
            field_label: "Size".to_string(),
            field_type: FieldType::Dropdown,
            options: vec!["  ".to_string()],
            required: false,
            visible: true,
            position: 0,
        };

        let field = form.into_domain(1);
        assert!(matches!(
            field.validate(),
            Err(TypeConstraintError::InvalidValue(_))
        ));
    }
}
