use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::notification::{
    GlobalSettings, InAppNotification, NewInAppNotification, NewTypeSetting, NotificationMethod,
    TypeSetting, UserPreference,
};
use crate::models::notification::{
    GlobalSettings as DbGlobalSettings, InAppNotification as DbInAppNotification,
    NewInAppNotification as DbNewInAppNotification, NewTypeSetting as DbNewTypeSetting,
    TypeSetting as DbTypeSetting, UserPreference as DbUserPreference,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, NotificationReader, NotificationWriter};

impl NotificationReader for DieselRepository {
    fn get_global_settings(&self, church_id: i32) -> RepositoryResult<Option<GlobalSettings>> {
        use crate::schema::notification_settings;

        let mut conn = self.conn()?;
        let settings = notification_settings::table
            .find(church_id)
            .first::<DbGlobalSettings>(&mut conn)
            .optional()?;

        Ok(settings.map(Into::into))
    }

    fn get_type_setting(
        &self,
        church_id: i32,
        notification_type: &str,
        method: NotificationMethod,
    ) -> RepositoryResult<Option<TypeSetting>> {
        use crate::schema::notification_type_settings;

        let mut conn = self.conn()?;
        let setting = notification_type_settings::table
            .filter(notification_type_settings::church_id.eq(church_id))
            .filter(notification_type_settings::notification_type.eq(notification_type))
            .filter(notification_type_settings::method.eq(method.to_string()))
            .first::<DbTypeSetting>(&mut conn)
            .optional()?;

        match setting {
            Some(setting) => Ok(Some(
                TypeSetting::try_from(setting).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_type_settings(&self, church_id: i32) -> RepositoryResult<Vec<TypeSetting>> {
        use crate::schema::notification_type_settings;

        let mut conn = self.conn()?;
        notification_type_settings::table
            .filter(notification_type_settings::church_id.eq(church_id))
            .order((
                notification_type_settings::notification_type.asc(),
                notification_type_settings::method.asc(),
            ))
            .load::<DbTypeSetting>(&mut conn)?
            .into_iter()
            .map(|s| TypeSetting::try_from(s).map_err(RepositoryError::from))
            .collect()
    }

    fn get_user_preference(
        &self,
        user_id: &str,
        notification_type: &str,
        method: NotificationMethod,
    ) -> RepositoryResult<Option<UserPreference>> {
        use crate::schema::user_notification_prefs;

        let mut conn = self.conn()?;
        let pref = user_notification_prefs::table
            .find((user_id, notification_type, method.to_string()))
            .first::<DbUserPreference>(&mut conn)
            .optional()?;

        match pref {
            Some(pref) => Ok(Some(
                UserPreference::try_from(pref).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_in_app_notifications(
        &self,
        church_id: i32,
        user_id: &str,
    ) -> RepositoryResult<Vec<InAppNotification>> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let items = notifications::table
            .filter(notifications::church_id.eq(church_id))
            .filter(notifications::user_id.eq(user_id))
            .order(notifications::created_at.desc())
            .load::<DbInAppNotification>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(items)
    }
}

impl NotificationWriter for DieselRepository {
    fn upsert_global_settings(&self, settings: &GlobalSettings) -> RepositoryResult<()> {
        use crate::schema::notification_settings;

        let mut conn = self.conn()?;
        let row: DbGlobalSettings = settings.into();

        diesel::insert_into(notification_settings::table)
            .values(&row)
            .on_conflict(notification_settings::church_id)
            .do_update()
            .set((
                notification_settings::email_enabled
                    .eq(excluded(notification_settings::email_enabled)),
                notification_settings::push_enabled
                    .eq(excluded(notification_settings::push_enabled)),
                notification_settings::sms_enabled
                    .eq(excluded(notification_settings::sms_enabled)),
                notification_settings::in_app_enabled
                    .eq(excluded(notification_settings::in_app_enabled)),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn upsert_type_setting(&self, setting: &NewTypeSetting) -> RepositoryResult<()> {
        use crate::schema::notification_type_settings;

        let mut conn = self.conn()?;
        let row: DbNewTypeSetting = setting.into();

        diesel::insert_into(notification_type_settings::table)
            .values(&row)
            .on_conflict((
                notification_type_settings::church_id,
                notification_type_settings::notification_type,
                notification_type_settings::method,
            ))
            .do_update()
            .set((
                notification_type_settings::enabled
                    .eq(excluded(notification_type_settings::enabled)),
                notification_type_settings::roles
                    .eq(excluded(notification_type_settings::roles)),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn set_user_preference(&self, preference: &UserPreference) -> RepositoryResult<()> {
        use crate::schema::user_notification_prefs;

        let mut conn = self.conn()?;
        let row: DbUserPreference = preference.into();

        diesel::insert_into(user_notification_prefs::table)
            .values(&row)
            .on_conflict((
                user_notification_prefs::user_id,
                user_notification_prefs::notification_type,
                user_notification_prefs::method,
            ))
            .do_update()
            .set(user_notification_prefs::enabled
                .eq(excluded(user_notification_prefs::enabled)))
            .execute(&mut conn)?;

        Ok(())
    }

    fn create_in_app_notification(
        &self,
        notification: &NewInAppNotification,
    ) -> RepositoryResult<InAppNotification> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let insertable: DbNewInAppNotification = notification.into();

        let created = diesel::insert_into(notifications::table)
            .values(&insertable)
            .get_result::<DbInAppNotification>(&mut conn)?;

        Ok(created.into())
    }

    fn mark_notifications_read(&self, user_id: &str, ids: &[i32]) -> RepositoryResult<usize> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::id.eq_any(ids)),
        )
        .set(notifications::read.eq(true))
        .execute(&mut conn)?;

        Ok(updated)
    }
}
