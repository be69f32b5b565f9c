use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::visit::{NewPlannedVisit, PlannedVisit, UpdatePlannedVisit, VisitStatus};
use crate::models::visit::{
    NewPlannedVisit as DbNewPlannedVisit, PlannedVisit as DbPlannedVisit,
    UpdatePlannedVisit as DbUpdatePlannedVisit,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, VisitListQuery, VisitReader, VisitWriter};

impl VisitReader for DieselRepository {
    fn get_visit_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<PlannedVisit>> {
        use crate::schema::planned_visits;

        let mut conn = self.conn()?;
        let visit = planned_visits::table
            .find(id)
            .filter(planned_visits::church_id.eq(church_id))
            .first::<DbPlannedVisit>(&mut conn)
            .optional()?;

        match visit {
            Some(visit) => Ok(Some(
                PlannedVisit::try_from(visit).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_visits(&self, query: VisitListQuery) -> RepositoryResult<(usize, Vec<PlannedVisit>)> {
        use crate::schema::planned_visits;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = planned_visits::table
                .filter(planned_visits::church_id.eq(query.church_id))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = &query.status {
                items = items.filter(planned_visits::status.eq(status.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let visits = items
            .order(planned_visits::event_date.desc())
            .load::<DbPlannedVisit>(&mut conn)?
            .into_iter()
            .map(|v| PlannedVisit::try_from(v).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, visits))
    }

    fn count_open_visits(&self, church_id: i32) -> RepositoryResult<i64> {
        use crate::schema::planned_visits;

        let mut conn = self.conn()?;
        let count = planned_visits::table
            .filter(planned_visits::church_id.eq(church_id))
            .filter(planned_visits::status.eq_any(vec![
                VisitStatus::Planned.to_string(),
                VisitStatus::Contacted.to_string(),
                VisitStatus::Confirmed.to_string(),
            ]))
            .count()
            .get_result(&mut conn)?;

        Ok(count)
    }
}

impl VisitWriter for DieselRepository {
    fn create_visit(&self, visit: &NewPlannedVisit) -> RepositoryResult<PlannedVisit> {
        use crate::schema::planned_visits;

        let mut conn = self.conn()?;
        let insertable: DbNewPlannedVisit = visit.into();

        let created = diesel::insert_into(planned_visits::table)
            .values(&insertable)
            .get_result::<DbPlannedVisit>(&mut conn)?;

        PlannedVisit::try_from(created).map_err(RepositoryError::from)
    }

    fn update_visit(
        &self,
        visit_id: i32,
        updates: &UpdatePlannedVisit,
    ) -> RepositoryResult<PlannedVisit> {
        use crate::schema::planned_visits;

        let mut conn = self.conn()?;
        let db_updates = DbUpdatePlannedVisit::from_domain(updates, Utc::now().naive_utc());

        let updated = diesel::update(planned_visits::table.find(visit_id))
            .set(&db_updates)
            .get_result::<DbPlannedVisit>(&mut conn)?;

        PlannedVisit::try_from(updated).map_err(RepositoryError::from)
    }

    fn mark_visit_converted(
        &self,
        visit_id: i32,
        contact_id: i32,
        converted_at: NaiveDateTime,
    ) -> RepositoryResult<PlannedVisit> {
        use crate::schema::planned_visits;

        let mut conn = self.conn()?;
        let updated = diesel::update(planned_visits::table.find(visit_id))
            .set((
                planned_visits::contact_id.eq(Some(contact_id)),
                planned_visits::status.eq(VisitStatus::Attended.to_string()),
                planned_visits::converted_at.eq(Some(converted_at)),
                planned_visits::updated_at.eq(converted_at),
            ))
            .get_result::<DbPlannedVisit>(&mut conn)?;

        PlannedVisit::try_from(updated).map_err(RepositoryError::from)
    }

    fn record_visit_message(
        &self,
        visit_id: i32,
        sent_at: NaiveDateTime,
    ) -> RepositoryResult<()> {
        use crate::schema::planned_visits;

        let mut conn = self.conn()?;
        diesel::update(planned_visits::table.find(visit_id))
            .set((
                planned_visits::message_count.eq(planned_visits::message_count + 1),
                planned_visits::last_message_at.eq(Some(sent_at)),
                planned_visits::updated_at.eq(sent_at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
