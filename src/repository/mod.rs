use chrono::{NaiveDate, NaiveDateTime};

use crate::db::{DbConnection, DbPool};
use crate::domain::comms::{
    Campaign, CampaignMetrics, CampaignRecipient, CampaignStatus, CommsMetrics, NewCampaign,
    NewCampaignRecipient, NewTemplate, RecipientStatus, Template, UpdateTemplate,
};
use crate::domain::contact::{Contact, Lifecycle, NewContact, UpdateContact};
use crate::domain::custom_field::{CustomField, NewCustomField};
use crate::domain::email::{NewQueuedEmail, QueuedEmail};
use crate::domain::event::{
    AttendanceRecord, Event, NewAttendanceRecord, NewEvent, UpdateEvent,
};
use crate::domain::finance::{Expense, NewExpense, NewTransaction, Transaction};
use crate::domain::group::{Group, GroupMember, NewGroup, NewGroupMember, UpdateGroup};
use crate::domain::newsletter::{Issue, NewIssue, NewSubscriber, Subscriber};
use crate::domain::notification::{
    GlobalSettings, InAppNotification, NewInAppNotification, NewTypeSetting, NotificationMethod,
    TypeSetting, UserPreference,
};
use crate::domain::transport::{
    Driver, EventDriver, NewDriver, NewEventDriver, NewTransportRequest, NewTransportRoute,
    NewVehicle, RequestStatus, TransportRequest, TransportRoute, TransportSummary, Vehicle,
    VehicleUtilization,
};
use crate::domain::visit::{NewPlannedVisit, PlannedVisit, UpdatePlannedVisit, VisitStatus};
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod comms;
pub mod contact;
pub mod custom_field;
pub mod email_queue;
pub mod errors;
pub mod event;
pub mod finance;
pub mod group;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod newsletter;
pub mod notification;
pub mod transport;
pub mod visit;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone)]
pub struct ContactListQuery {
    pub church_id: i32,
    pub search: Option<String>,
    pub lifecycle: Option<Lifecycle>,
    pub pagination: Option<Pagination>,
}

impl ContactListQuery {
    pub fn new(church_id: i32) -> Self {
        Self {
            church_id,
            search: None,
            lifecycle: None,
            pagination: None,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct EventListQuery {
    pub church_id: i32,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub pagination: Option<Pagination>,
}

impl EventListQuery {
    pub fn new(church_id: i32) -> Self {
        Self {
            church_id,
            from: None,
            to: None,
            pagination: None,
        }
    }

    pub fn from(mut self, from: NaiveDateTime) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: NaiveDateTime) -> Self {
        self.to = Some(to);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct VisitListQuery {
    pub church_id: i32,
    pub status: Option<VisitStatus>,
    pub pagination: Option<Pagination>,
}

impl VisitListQuery {
    pub fn new(church_id: i32) -> Self {
        Self {
            church_id,
            status: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: VisitStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct TransportRequestQuery {
    pub event_id: i32,
    pub status: Option<RequestStatus>,
    pub only_unassigned: bool,
}

impl TransportRequestQuery {
    pub fn new(event_id: i32) -> Self {
        Self {
            event_id,
            status: None,
            only_unassigned: false,
        }
    }

    pub fn status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn only_unassigned(mut self) -> Self {
        self.only_unassigned = true;
        self
    }
}

pub trait ContactReader {
    fn get_contact_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Contact>>;
    fn get_contact_by_email(&self, email: &str, church_id: i32)
    -> RepositoryResult<Option<Contact>>;
    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)>;
    fn count_contacts_by_lifecycle(&self, church_id: i32) -> RepositoryResult<Vec<(String, i64)>>;
}

pub trait ContactWriter {
    fn create_contacts(&self, new_contacts: &[NewContact]) -> RepositoryResult<usize>;
    fn update_contact(&self, contact_id: i32, updates: &UpdateContact)
    -> RepositoryResult<Contact>;
    fn set_contact_lifecycle(&self, contact_id: i32, lifecycle: Lifecycle) -> RepositoryResult<()>;
    fn delete_contact(&self, contact_id: i32) -> RepositoryResult<()>;
}

pub trait CustomFieldReader {
    fn list_custom_fields(
        &self,
        church_id: i32,
        entity: Option<&str>,
    ) -> RepositoryResult<Vec<CustomField>>;
}

pub trait CustomFieldWriter {
    fn create_custom_field(&self, field: &NewCustomField) -> RepositoryResult<CustomField>;
    fn delete_custom_field(&self, field_id: i32, church_id: i32) -> RepositoryResult<()>;
}

pub trait TemplateReader {
    fn get_template_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Template>>;
    fn list_templates(&self, church_id: i32) -> RepositoryResult<Vec<Template>>;
}

pub trait TemplateWriter {
    fn create_template(&self, template: &NewTemplate) -> RepositoryResult<Template>;
    fn update_template(
        &self,
        template_id: i32,
        updates: &UpdateTemplate,
    ) -> RepositoryResult<Template>;
    fn delete_template(&self, template_id: i32) -> RepositoryResult<()>;
}

pub trait CampaignReader {
    fn get_campaign_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Campaign>>;
    fn list_campaigns(
        &self,
        church_id: i32,
        status: Option<CampaignStatus>,
    ) -> RepositoryResult<Vec<Campaign>>;
    fn campaign_metrics(&self, campaign_id: i32) -> RepositoryResult<CampaignMetrics>;
    fn comms_metrics(&self, church_id: i32) -> RepositoryResult<CommsMetrics>;
    /// Scheduled campaigns across all churches whose send time has passed.
    fn list_due_campaigns(&self, now: NaiveDateTime) -> RepositoryResult<Vec<Campaign>>;
    fn list_sending_campaigns(&self) -> RepositoryResult<Vec<Campaign>>;
    fn list_campaign_recipients(
        &self,
        campaign_id: i32,
    ) -> RepositoryResult<Vec<CampaignRecipient>>;
}

pub trait CampaignWriter {
    fn create_campaign(&self, campaign: &NewCampaign) -> RepositoryResult<Campaign>;
    fn set_campaign_status(
        &self,
        campaign_id: i32,
        status: CampaignStatus,
        scheduled_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Campaign>;
    fn delete_campaign(&self, campaign_id: i32) -> RepositoryResult<()>;
    fn add_campaign_recipients(
        &self,
        recipients: &[NewCampaignRecipient],
    ) -> RepositoryResult<usize>;
    fn mark_campaign_recipient(
        &self,
        recipient_id: i32,
        status: RecipientStatus,
        error: Option<&str>,
        sent_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<()>;
}

pub trait SubscriberReader {
    fn list_subscribers(
        &self,
        church_id: i32,
        subscribed_only: bool,
    ) -> RepositoryResult<Vec<Subscriber>>;
}

pub trait SubscriberWriter {
    /// Inserts the addresses that are not present yet; returns how many were added.
    fn upsert_subscribers(&self, subscribers: &[NewSubscriber]) -> RepositoryResult<usize>;
    fn unsubscribe(&self, church_id: i32, email: &str) -> RepositoryResult<bool>;
}

pub trait IssueReader {
    fn get_issue_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Issue>>;
    fn list_issues(&self, church_id: i32) -> RepositoryResult<Vec<Issue>>;
}

pub trait IssueWriter {
    fn create_issue(&self, issue: &NewIssue) -> RepositoryResult<Issue>;
    fn mark_issue_sent(&self, issue_id: i32, sent_at: NaiveDateTime) -> RepositoryResult<Issue>;
}

pub trait EventReader {
    fn get_event_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Event>>;
    fn list_events(&self, query: EventListQuery) -> RepositoryResult<(usize, Vec<Event>)>;
    fn get_events_by_ids(&self, ids: &[i32], church_id: i32) -> RepositoryResult<Vec<Event>>;
}

pub trait EventWriter {
    fn create_event(&self, event: &NewEvent) -> RepositoryResult<Event>;
    fn update_event(&self, event_id: i32, updates: &UpdateEvent) -> RepositoryResult<Event>;
    fn delete_event(&self, event_id: i32) -> RepositoryResult<()>;
}

pub trait AttendanceReader {
    fn list_attendance(
        &self,
        event_id: i32,
    ) -> RepositoryResult<Vec<(AttendanceRecord, Contact)>>;
    fn count_attendance(&self, event_id: i32) -> RepositoryResult<i64>;
    fn count_attendance_since(&self, church_id: i32, since: NaiveDateTime)
    -> RepositoryResult<i64>;
}

pub trait AttendanceWriter {
    fn create_attendance_record(
        &self,
        record: &NewAttendanceRecord,
    ) -> RepositoryResult<AttendanceRecord>;
}

pub trait GroupReader {
    fn get_group_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Group>>;
    fn list_groups_with_counts(&self, church_id: i32) -> RepositoryResult<Vec<(Group, i64)>>;
    fn list_group_members(&self, group_id: i32)
    -> RepositoryResult<Vec<(GroupMember, Contact)>>;
    fn count_groups(&self, church_id: i32) -> RepositoryResult<i64>;
}

pub trait GroupWriter {
    fn create_group(&self, group: &NewGroup) -> RepositoryResult<Group>;
    fn update_group(&self, group_id: i32, updates: &UpdateGroup) -> RepositoryResult<Group>;
    fn delete_group(&self, group_id: i32) -> RepositoryResult<()>;
    fn add_group_member(&self, member: &NewGroupMember) -> RepositoryResult<GroupMember>;
    fn remove_group_member(&self, group_id: i32, contact_id: i32) -> RepositoryResult<()>;
}

pub trait VisitReader {
    fn get_visit_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<PlannedVisit>>;
    fn list_visits(&self, query: VisitListQuery) -> RepositoryResult<(usize, Vec<PlannedVisit>)>;
    fn count_open_visits(&self, church_id: i32) -> RepositoryResult<i64>;
}

pub trait VisitWriter {
    fn create_visit(&self, visit: &NewPlannedVisit) -> RepositoryResult<PlannedVisit>;
    fn update_visit(
        &self,
        visit_id: i32,
        updates: &UpdatePlannedVisit,
    ) -> RepositoryResult<PlannedVisit>;
    fn mark_visit_converted(
        &self,
        visit_id: i32,
        contact_id: i32,
        converted_at: NaiveDateTime,
    ) -> RepositoryResult<PlannedVisit>;
    fn record_visit_message(
        &self,
        visit_id: i32,
        sent_at: NaiveDateTime,
    ) -> RepositoryResult<()>;
}

pub trait FinanceReader {
    fn list_transactions(
        &self,
        church_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Transaction>>;
    fn list_expenses(
        &self,
        church_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Expense>>;
}

pub trait FinanceWriter {
    fn create_transaction(&self, tx: &NewTransaction) -> RepositoryResult<Transaction>;
    fn create_expense(&self, expense: &NewExpense) -> RepositoryResult<Expense>;
}

pub trait TransportReader {
    fn list_transport_requests(
        &self,
        query: TransportRequestQuery,
    ) -> RepositoryResult<Vec<TransportRequest>>;
    fn list_requests_with_contacts(
        &self,
        event_id: i32,
    ) -> RepositoryResult<Vec<(TransportRequest, Contact)>>;
    fn list_event_drivers(&self, event_id: i32) -> RepositoryResult<Vec<EventDriver>>;
    fn transport_summary(&self, event_id: i32) -> RepositoryResult<TransportSummary>;
    fn list_routes(&self, event_id: i32) -> RepositoryResult<Vec<TransportRoute>>;
    fn list_routes_with_fleet(
        &self,
        event_id: i32,
    ) -> RepositoryResult<Vec<(TransportRoute, Driver, Vehicle)>>;
    fn list_drivers(&self, church_id: i32) -> RepositoryResult<Vec<Driver>>;
    fn list_vehicles(&self, church_id: i32) -> RepositoryResult<Vec<Vehicle>>;
    fn vehicle_utilization(
        &self,
        church_id: i32,
        event_id: Option<i32>,
    ) -> RepositoryResult<Vec<VehicleUtilization>>;
}

pub trait TransportWriter {
    fn create_transport_request(
        &self,
        request: &NewTransportRequest,
    ) -> RepositoryResult<TransportRequest>;
    fn assign_transport_request(
        &self,
        request_id: i32,
        driver_id: i32,
        vehicle_id: i32,
    ) -> RepositoryResult<()>;
    fn delete_transport_requests(&self, request_ids: &[i32]) -> RepositoryResult<usize>;
    /// Replaces the event's stored routes in one transaction.
    fn replace_event_routes(
        &self,
        event_id: i32,
        routes: &[NewTransportRoute],
    ) -> RepositoryResult<usize>;
    fn create_driver(&self, driver: &NewDriver) -> RepositoryResult<Driver>;
    fn create_vehicle(&self, vehicle: &NewVehicle) -> RepositoryResult<Vehicle>;
    fn roster_event_driver(&self, roster: &NewEventDriver) -> RepositoryResult<()>;
}

pub trait EmailQueueReader {
    fn get_queued_email(&self, id: i32) -> RepositoryResult<Option<QueuedEmail>>;
}

pub trait EmailQueueWriter {
    fn enqueue_emails(&self, emails: &[NewQueuedEmail]) -> RepositoryResult<usize>;
    /// Atomically claims up to `batch_size` due entries, marking them
    /// `sending` and bumping their attempt counters.
    fn claim_due_emails(
        &self,
        now: NaiveDateTime,
        batch_size: usize,
        max_attempts: i32,
    ) -> RepositoryResult<Vec<QueuedEmail>>;
    fn mark_email_sent(&self, email_id: i32, sent_at: NaiveDateTime) -> RepositoryResult<()>;
    fn mark_email_failed(
        &self,
        email_id: i32,
        error: &str,
        next_attempt_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> RepositoryResult<()>;
}

pub trait NotificationReader {
    fn get_global_settings(&self, church_id: i32) -> RepositoryResult<Option<GlobalSettings>>;
    fn get_type_setting(
        &self,
        church_id: i32,
        notification_type: &str,
        method: NotificationMethod,
    ) -> RepositoryResult<Option<TypeSetting>>;
    fn list_type_settings(&self, church_id: i32) -> RepositoryResult<Vec<TypeSetting>>;
    fn get_user_preference(
        &self,
        user_id: &str,
        notification_type: &str,
        method: NotificationMethod,
    ) -> RepositoryResult<Option<UserPreference>>;
    fn list_in_app_notifications(
        &self,
        church_id: i32,
        user_id: &str,
    ) -> RepositoryResult<Vec<InAppNotification>>;
}

pub trait NotificationWriter {
    fn upsert_global_settings(&self, settings: &GlobalSettings) -> RepositoryResult<()>;
    fn upsert_type_setting(&self, setting: &NewTypeSetting) -> RepositoryResult<()>;
    fn set_user_preference(&self, preference: &UserPreference) -> RepositoryResult<()>;
    fn create_in_app_notification(
        &self,
        notification: &NewInAppNotification,
    ) -> RepositoryResult<InAppNotification>;
    fn mark_notifications_read(&self, user_id: &str, ids: &[i32]) -> RepositoryResult<usize>;
}

#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> Result<DbConnection, RepositoryError> {
        crate::db::get_connection(&self.pool).map_err(RepositoryError::from)
    }
}
