use diesel::prelude::*;

use crate::domain::contact::Contact;
use crate::domain::group::{Group, GroupMember, NewGroup, NewGroupMember, UpdateGroup};
use crate::models::contact::Contact as DbContact;
use crate::models::group::{
    Group as DbGroup, GroupMember as DbGroupMember, NewGroup as DbNewGroup,
    NewGroupMember as DbNewGroupMember, UpdateGroup as DbUpdateGroup,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, GroupReader, GroupWriter};

impl GroupReader for DieselRepository {
    fn get_group_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Group>> {
        use crate::schema::groups;

        let mut conn = self.conn()?;
        let group = groups::table
            .find(id)
            .filter(groups::church_id.eq(church_id))
            .first::<DbGroup>(&mut conn)
            .optional()?;

        Ok(group.map(Into::into))
    }

    fn list_groups_with_counts(&self, church_id: i32) -> RepositoryResult<Vec<(Group, i64)>> {
        use crate::schema::{group_members, groups};

        let mut conn = self.conn()?;

        let groups = groups::table
            .filter(groups::church_id.eq(church_id))
            .order(groups::name.asc())
            .load::<DbGroup>(&mut conn)?;

        let group_ids: Vec<i32> = groups.iter().map(|g| g.id).collect();
        let counts = group_members::table
            .filter(group_members::group_id.eq_any(&group_ids))
            .group_by(group_members::group_id)
            .select((group_members::group_id, diesel::dsl::count_star()))
            .load::<(i32, i64)>(&mut conn)?;

        let groups_with_counts = groups
            .into_iter()
            .map(|group| {
                let count = counts
                    .iter()
                    .find(|(group_id, _)| *group_id == group.id)
                    .map(|(_, count)| *count)
                    .unwrap_or(0);
                (group.into(), count)
            })
            .collect();

        Ok(groups_with_counts)
    }

    fn list_group_members(
        &self,
        group_id: i32,
    ) -> RepositoryResult<Vec<(GroupMember, Contact)>> {
        use crate::schema::{contacts, group_members};

        let mut conn = self.conn()?;
        let rows = group_members::table
            .inner_join(contacts::table)
            .filter(group_members::group_id.eq(group_id))
            .order(group_members::joined_at.asc())
            .load::<(DbGroupMember, DbContact)>(&mut conn)?;

        rows.into_iter()
            .map(|(member, contact)| {
                let contact = Contact::try_from(contact).map_err(RepositoryError::from)?;
                Ok((member.into(), contact))
            })
            .collect()
    }

    fn count_groups(&self, church_id: i32) -> RepositoryResult<i64> {
        use crate::schema::groups;

        let mut conn = self.conn()?;
        let count = groups::table
            .filter(groups::church_id.eq(church_id))
            .count()
            .get_result(&mut conn)?;

        Ok(count)
    }
}

impl GroupWriter for DieselRepository {
    fn create_group(&self, group: &NewGroup) -> RepositoryResult<Group> {
        use crate::schema::groups;

        let mut conn = self.conn()?;
        let insertable: DbNewGroup = group.into();

        let created = diesel::insert_into(groups::table)
            .values(&insertable)
            .get_result::<DbGroup>(&mut conn)?;

        Ok(created.into())
    }

    fn update_group(&self, group_id: i32, updates: &UpdateGroup) -> RepositoryResult<Group> {
        use crate::schema::groups;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateGroup = updates.into();

        let updated = diesel::update(groups::table.find(group_id))
            .set(&db_updates)
            .get_result::<DbGroup>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_group(&self, group_id: i32) -> RepositoryResult<()> {
        use crate::schema::{group_members, groups};

        let mut conn = self.conn()?;

        diesel::delete(group_members::table.filter(group_members::group_id.eq(group_id)))
            .execute(&mut conn)?;
        diesel::delete(groups::table.find(group_id)).execute(&mut conn)?;

        Ok(())
    }

    fn add_group_member(&self, member: &NewGroupMember) -> RepositoryResult<GroupMember> {
        use crate::schema::group_members;

        let mut conn = self.conn()?;
        let insertable: DbNewGroupMember = member.into();

        let created = diesel::insert_into(group_members::table)
            .values(&insertable)
            .on_conflict((group_members::group_id, group_members::contact_id))
            .do_update()
            .set(group_members::role.eq(insertable.role))
            .get_result::<DbGroupMember>(&mut conn)?;

        Ok(created.into())
    }

    fn remove_group_member(&self, group_id: i32, contact_id: i32) -> RepositoryResult<()> {
        use crate::schema::group_members;

        let mut conn = self.conn()?;
        diesel::delete(
            group_members::table
                .filter(group_members::group_id.eq(group_id))
                .filter(group_members::contact_id.eq(contact_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }
}
