use diesel::prelude::*;

use crate::domain::custom_field::{CustomField, NewCustomField};
use crate::models::custom_field::{
    CustomField as DbCustomField, NewCustomField as DbNewCustomField,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CustomFieldReader, CustomFieldWriter, DieselRepository};

impl CustomFieldReader for DieselRepository {
    fn list_custom_fields(
        &self,
        church_id: i32,
        entity: Option<&str>,
    ) -> RepositoryResult<Vec<CustomField>> {
        use crate::schema::custom_fields;

        let mut conn = self.conn()?;

        let mut query = custom_fields::table
            .filter(custom_fields::church_id.eq(church_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(entity) = entity {
            query = query.filter(custom_fields::entity.eq(entity));
        }

        let fields = query
            .order(custom_fields::position.asc())
            .load::<DbCustomField>(&mut conn)?
            .into_iter()
            .map(|f| CustomField::try_from(f).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(fields)
    }
}

impl CustomFieldWriter for DieselRepository {
    fn create_custom_field(&self, field: &NewCustomField) -> RepositoryResult<CustomField> {
        use crate::schema::custom_fields;

        let mut conn = self.conn()?;
        let insertable: DbNewCustomField = field.into();

        let created = diesel::insert_into(custom_fields::table)
            .values(&insertable)
            .get_result::<DbCustomField>(&mut conn)?;

        CustomField::try_from(created).map_err(RepositoryError::from)
    }

    fn delete_custom_field(&self, field_id: i32, church_id: i32) -> RepositoryResult<()> {
        use crate::schema::custom_fields;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            custom_fields::table
                .find(field_id)
                .filter(custom_fields::church_id.eq(church_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
