use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::notification::{
    GlobalSettings as DomainGlobalSettings, InAppNotification as DomainInAppNotification,
    NewInAppNotification as DomainNewInAppNotification, NewTypeSetting as DomainNewTypeSetting,
    NotificationMethod, TypeSetting as DomainTypeSetting, UserPreference as DomainUserPreference,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::notification_settings)]
pub struct GlobalSettings {
    pub church_id: i32,
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub sms_enabled: bool,
    pub in_app_enabled: bool,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::notification_type_settings)]
pub struct TypeSetting {
    pub id: i32,
    pub church_id: i32,
    pub notification_type: String,
    pub method: String,
    pub enabled: bool,
    pub roles: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::notification_type_settings)]
pub struct NewTypeSetting<'a> {
    pub church_id: i32,
    pub notification_type: &'a str,
    pub method: String,
    pub enabled: bool,
    pub roles: String,
}

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::user_notification_prefs)]
pub struct UserPreference {
    pub user_id: String,
    pub notification_type: String,
    pub method: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct InAppNotification {
    pub id: i32,
    pub church_id: i32,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub data: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewInAppNotification<'a> {
    pub church_id: i32,
    pub user_id: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub data: String,
}

impl From<GlobalSettings> for DomainGlobalSettings {
    fn from(settings: GlobalSettings) -> Self {
        Self {
            church_id: settings.church_id,
            email_enabled: settings.email_enabled,
            push_enabled: settings.push_enabled,
            sms_enabled: settings.sms_enabled,
            in_app_enabled: settings.in_app_enabled,
        }
    }
}

impl From<&DomainGlobalSettings> for GlobalSettings {
    fn from(settings: &DomainGlobalSettings) -> Self {
        Self {
            church_id: settings.church_id,
            email_enabled: settings.email_enabled,
            push_enabled: settings.push_enabled,
            sms_enabled: settings.sms_enabled,
            in_app_enabled: settings.in_app_enabled,
        }
    }
}

impl TryFrom<TypeSetting> for DomainTypeSetting {
    type Error = TypeConstraintError;

    fn try_from(setting: TypeSetting) -> Result<Self, Self::Error> {
        let roles = serde_json::from_str::<Vec<String>>(&setting.roles)
            .map_err(|_| TypeConstraintError::InvalidValue(setting.roles.clone()))?;

        Ok(Self {
            id: setting.id,
            church_id: setting.church_id,
            notification_type: setting.notification_type,
            method: setting.method.parse::<NotificationMethod>()?,
            enabled: setting.enabled,
            roles,
        })
    }
}

impl<'a> From<&'a DomainNewTypeSetting> for NewTypeSetting<'a> {
    fn from(setting: &'a DomainNewTypeSetting) -> Self {
        Self {
            church_id: setting.church_id,
            notification_type: &setting.notification_type,
            method: setting.method.to_string(),
            enabled: setting.enabled,
            roles: serde_json::to_string(&setting.roles).unwrap_or_else(|_| "[]".to_string()),
        }
    }
}

impl TryFrom<UserPreference> for DomainUserPreference {
    type Error = TypeConstraintError;

    fn try_from(pref: UserPreference) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: pref.user_id,
            notification_type: pref.notification_type,
            method: pref.method.parse::<NotificationMethod>()?,
            enabled: pref.enabled,
        })
    }
}

impl From<&DomainUserPreference> for UserPreference {
    fn from(pref: &DomainUserPreference) -> Self {
        Self {
            user_id: pref.user_id.clone(),
            notification_type: pref.notification_type.clone(),
            method: pref.method.to_string(),
            enabled: pref.enabled,
        }
    }
}

impl From<InAppNotification> for DomainInAppNotification {
    fn from(notification: InAppNotification) -> Self {
        let data = serde_json::from_str(&notification.data).unwrap_or_default();
        Self {
            id: notification.id,
            church_id: notification.church_id,
            user_id: notification.user_id,
            title: notification.title,
            body: notification.body,
            data,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewInAppNotification> for NewInAppNotification<'a> {
    fn from(notification: &'a DomainNewInAppNotification) -> Self {
        Self {
            church_id: notification.church_id,
            user_id: &notification.user_id,
            title: &notification.title,
            body: &notification.body,
            data: notification.data.to_string(),
        }
    }
}
