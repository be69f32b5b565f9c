//! Admin-defined dynamic fields attached to an entity.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, text_enum};

text_enum!(
    FieldType {
        Text => "text",
        Textarea => "textarea",
        Date => "date",
        Dropdown => "dropdown",
        Toggle => "toggle",
        Number => "number",
        Email => "email",
        Phone => "phone",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomField {
    pub id: i32,
    pub church_id: i32,
    /// Entity the field is attached to, e.g. `contacts` or `events`.
    pub entity: String,
    pub field_name: String,
    pub field_label: String,
    pub field_type: FieldType,
    pub options: Vec<String>,
    pub required: bool,
    pub visible: bool,
    pub position: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCustomField {
    pub church_id: i32,
    pub entity: String,
    pub field_name: String,
    pub field_label: String,
    pub field_type: FieldType,
    pub options: Vec<String>,
    pub required: bool,
    pub visible: bool,
    pub position: i32,
}

impl NewCustomField {
    /// A dropdown without options can never be filled in, so it is rejected
    /// before it reaches storage.
    pub fn validate(&self) -> Result<(), TypeConstraintError> {
        if self.field_name.trim().is_empty() || self.field_label.trim().is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if self.field_type == FieldType::Dropdown && self.options.is_empty() {
            return Err(TypeConstraintError::InvalidValue(
                "dropdown fields require at least one option".to_string(),
            ));
        }
        Ok(())
    }
}

impl CustomField {
    /// Checks a submitted value against the field definition.
    pub fn validate_value(&self, value: &str) -> Result<(), TypeConstraintError> {
        let value = value.trim();
        if value.is_empty() {
            if self.required {
                return Err(TypeConstraintError::EmptyString);
            }
            return Ok(());
        }

        match self.field_type {
            FieldType::Text | FieldType::Textarea => Ok(()),
            FieldType::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| TypeConstraintError::InvalidValue(value.to_string())),
            FieldType::Dropdown => {
                if self.options.iter().any(|option| option == value) {
                    Ok(())
                } else {
                    Err(TypeConstraintError::InvalidValue(value.to_string()))
                }
            }
            FieldType::Toggle => match value {
                "true" | "false" => Ok(()),
                _ => Err(TypeConstraintError::InvalidValue(value.to_string())),
            },
            FieldType::Number => value
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| TypeConstraintError::InvalidValue(value.to_string())),
            FieldType::Email => crate::domain::types::normalize_email(value).map(|_| ()),
            FieldType::Phone => {
                crate::domain::types::normalize_phone_to_e164(value).map(|_| ())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn field(field_type: FieldType, options: Vec<String>, required: bool) -> CustomField {
        let now = Utc::now().naive_utc();
        CustomField {
            id: 1,
            church_id: 1,
            entity: "contacts".to_string(),
            field_name: "shirt_size".to_string(),
            field_label: "Shirt size".to_string(),
            field_type,
            options,
            required,
            visible: true,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn dropdown_without_options_is_rejected() {
        let new_field = NewCustomField {
            church_id: 1,
            entity: "contacts".to_string(),
            field_name: "size".to_string(),
            field_label: "Size".to_string(),
            field_type: FieldType::Dropdown,
            options: vec![],
            required: false,
            visible: true,
            position: 0,
        };
        assert!(new_field.validate().is_err());
    }

    #[test]
    fn dropdown_value_must_match_an_option() {
        let field = field(
            FieldType::Dropdown,
            vec!["S".to_string(), "M".to_string()],
            false,
        );
        assert!(field.validate_value("M").is_ok());
        assert!(field.validate_value("XXL").is_err());
    }

    #[test]
    fn empty_value_allowed_unless_required() {
        let optional = field(FieldType::Text, vec![], false);
        assert!(optional.validate_value(" ").is_ok());

        let required = field(FieldType::Text, vec![], true);
        assert!(required.validate_value(" ").is_err());
    }

    #[test]
    fn date_and_number_values_are_checked() {
        let date = field(FieldType::Date, vec![], false);
        assert!(date.validate_value("2026-03-01").is_ok());
        assert!(date.validate_value("01/03/2026").is_err());

        let number = field(FieldType::Number, vec![], false);
        assert!(number.validate_value("12.5").is_ok());
        assert!(number.validate_value("twelve").is_err());
    }
}
