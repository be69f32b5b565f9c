use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::group::{
    Group as DomainGroup, GroupMember as DomainGroupMember, NewGroup as DomainNewGroup,
    NewGroupMember as DomainNewGroupMember, UpdateGroup as DomainUpdateGroup,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::groups)]
pub struct Group {
    pub id: i32,
    pub church_id: i32,
    pub name: String,
    pub group_type: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::groups)]
pub struct NewGroup<'a> {
    pub church_id: i32,
    pub name: &'a str,
    pub group_type: &'a str,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::groups)]
pub struct UpdateGroup<'a> {
    pub name: &'a str,
    pub group_type: &'a str,
    pub status: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(table_name = crate::schema::group_members)]
#[diesel(belongs_to(Group, foreign_key = group_id))]
#[diesel(primary_key(group_id, contact_id))]
pub struct GroupMember {
    pub group_id: i32,
    pub contact_id: i32,
    pub role: String,
    pub joined_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::group_members)]
pub struct NewGroupMember<'a> {
    pub group_id: i32,
    pub contact_id: i32,
    pub role: &'a str,
}

impl From<Group> for DomainGroup {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            church_id: group.church_id,
            name: group.name,
            group_type: group.group_type,
            status: group.status,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewGroup> for NewGroup<'a> {
    fn from(group: &'a DomainNewGroup) -> Self {
        Self {
            church_id: group.church_id,
            name: &group.name,
            group_type: &group.group_type,
            status: &group.status,
        }
    }
}

impl<'a> From<&'a DomainUpdateGroup> for UpdateGroup<'a> {
    fn from(group: &'a DomainUpdateGroup) -> Self {
        Self {
            name: &group.name,
            group_type: &group.group_type,
            status: &group.status,
        }
    }
}

impl From<GroupMember> for DomainGroupMember {
    fn from(member: GroupMember) -> Self {
        Self {
            group_id: member.group_id,
            contact_id: member.contact_id,
            role: member.role,
            joined_at: member.joined_at,
        }
    }
}

impl<'a> From<&'a DomainNewGroupMember> for NewGroupMember<'a> {
    fn from(member: &'a DomainNewGroupMember) -> Self {
        Self {
            group_id: member.group_id,
            contact_id: member.contact_id,
            role: &member.role,
        }
    }
}
