use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::custom_field::{
    CustomField as DomainCustomField, FieldType, NewCustomField as DomainNewCustomField,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::custom_fields)]
pub struct CustomField {
    pub id: i32,
    pub church_id: i32,
    pub entity: String,
    pub field_name: String,
    pub field_label: String,
    pub field_type: String,
    pub options: Option<String>,
    pub required: bool,
    pub visible: bool,
    pub position: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::custom_fields)]
pub struct NewCustomField<'a> {
    pub church_id: i32,
    pub entity: &'a str,
    pub field_name: &'a str,
    pub field_label: &'a str,
    pub field_type: String,
    pub options: Option<String>,
    pub required: bool,
    pub visible: bool,
    pub position: i32,
}

impl TryFrom<CustomField> for DomainCustomField {
    type Error = TypeConstraintError;

    fn try_from(field: CustomField) -> Result<Self, Self::Error> {
        // Options live in the DB as a JSON array of strings.
        let options = match field.options.as_deref() {
            Some(raw) => serde_json::from_str::<Vec<String>>(raw)
                .map_err(|_| TypeConstraintError::InvalidValue(raw.to_string()))?,
            None => Vec::new(),
        };

        Ok(Self {
            id: field.id,
            church_id: field.church_id,
            entity: field.entity,
            field_name: field.field_name,
            field_label: field.field_label,
            field_type: field.field_type.parse::<FieldType>()?,
            options,
            required: field.required,
            visible: field.visible,
            position: field.position,
            created_at: field.created_at,
            updated_at: field.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCustomField> for NewCustomField<'a> {
    fn from(field: &'a DomainNewCustomField) -> Self {
        let options = if field.options.is_empty() {
            None
        } else {
            serde_json::to_string(&field.options).ok()
        };

        Self {
            church_id: field.church_id,
            entity: &field.entity,
            field_name: &field.field_name,
            field_label: &field.field_label,
            field_type: field.field_type.to_string(),
            options,
            required: field.required,
            visible: field.visible,
            position: field.position,
        }
    }
}
