//! Repository implementation for templates, campaigns and recipients.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comms::{
    Campaign, CampaignMetrics, CampaignRecipient, CampaignStatus, CommsMetrics, NewCampaign,
    NewCampaignRecipient, NewTemplate, RecipientStatus, Template, UpdateTemplate,
};
use crate::models::comms::{
    Campaign as DbCampaign, CampaignRecipient as DbCampaignRecipient, NewCampaign as DbNewCampaign,
    NewCampaignRecipient as DbNewCampaignRecipient, NewTemplate as DbNewTemplate,
    Template as DbTemplate, UpdateTemplate as DbUpdateTemplate,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CampaignReader, CampaignWriter, DieselRepository, TemplateReader,
    TemplateWriter};

impl TemplateReader for DieselRepository {
    fn get_template_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Template>> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let template = templates::table
            .find(id)
            .filter(templates::church_id.eq(church_id))
            .first::<DbTemplate>(&mut conn)
            .optional()?;

        match template {
            Some(template) => Ok(Some(
                Template::try_from(template).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_templates(&self, church_id: i32) -> RepositoryResult<Vec<Template>> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        templates::table
            .filter(templates::church_id.eq(church_id))
            .order(templates::updated_at.desc())
            .load::<DbTemplate>(&mut conn)?
            .into_iter()
            .map(|t| Template::try_from(t).map_err(RepositoryError::from))
            .collect()
    }
}

impl TemplateWriter for DieselRepository {
    fn create_template(&self, template: &NewTemplate) -> RepositoryResult<Template> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let insertable: DbNewTemplate = template.into();

        let created = diesel::insert_into(templates::table)
            .values(&insertable)
            .get_result::<DbTemplate>(&mut conn)?;

        Template::try_from(created).map_err(RepositoryError::from)
    }

    fn update_template(
        &self,
        template_id: i32,
        updates: &UpdateTemplate,
    ) -> RepositoryResult<Template> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateTemplate = updates.into();

        let updated = diesel::update(templates::table.find(template_id))
            .set(&db_updates)
            .get_result::<DbTemplate>(&mut conn)?;

        Template::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_template(&self, template_id: i32) -> RepositoryResult<()> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        diesel::delete(templates::table.find(template_id)).execute(&mut conn)?;
        Ok(())
    }
}

impl CampaignReader for DieselRepository {
    fn get_campaign_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Campaign>> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;
        let campaign = campaigns::table
            .find(id)
            .filter(campaigns::church_id.eq(church_id))
            .first::<DbCampaign>(&mut conn)
            .optional()?;

        match campaign {
            Some(campaign) => Ok(Some(
                Campaign::try_from(campaign).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_campaigns(
        &self,
        church_id: i32,
        status: Option<CampaignStatus>,
    ) -> RepositoryResult<Vec<Campaign>> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;

        let mut query = campaigns::table
            .filter(campaigns::church_id.eq(church_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status) = status {
            query = query.filter(campaigns::status.eq(status.to_string()));
        }

        query
            .order(campaigns::updated_at.desc())
            .load::<DbCampaign>(&mut conn)?
            .into_iter()
            .map(|c| Campaign::try_from(c).map_err(RepositoryError::from))
            .collect()
    }

    fn campaign_metrics(&self, campaign_id: i32) -> RepositoryResult<CampaignMetrics> {
        use crate::schema::campaign_recipients;

        let mut conn = self.conn()?;
        let counts = campaign_recipients::table
            .filter(campaign_recipients::campaign_id.eq(campaign_id))
            .group_by(campaign_recipients::status)
            .select((campaign_recipients::status, diesel::dsl::count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let mut metrics = CampaignMetrics::default();
        for (status, count) in counts {
            metrics.total_recipients += count;
            match status.as_str() {
                "pending" => metrics.pending_count = count,
                "sent" => metrics.sent_count = count,
                "failed" => metrics.failed_count = count,
                _ => {}
            }
        }

        Ok(metrics)
    }

    fn comms_metrics(&self, church_id: i32) -> RepositoryResult<CommsMetrics> {
        use crate::schema::{campaigns, templates};

        let mut conn = self.conn()?;
        let counts = campaigns::table
            .filter(campaigns::church_id.eq(church_id))
            .group_by(campaigns::status)
            .select((campaigns::status, diesel::dsl::count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let mut metrics = CommsMetrics::default();
        for (status, count) in counts {
            metrics.total_campaigns += count;
            match status.as_str() {
                "sending" => metrics.active_campaigns = count,
                "scheduled" => metrics.scheduled_campaigns = count,
                "completed" => metrics.completed_campaigns = count,
                _ => {}
            }
        }

        metrics.total_templates = templates::table
            .filter(templates::church_id.eq(church_id))
            .count()
            .get_result(&mut conn)?;

        Ok(metrics)
    }

    fn list_due_campaigns(&self, now: NaiveDateTime) -> RepositoryResult<Vec<Campaign>> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;
        campaigns::table
            .filter(campaigns::status.eq(CampaignStatus::Scheduled.to_string()))
            .filter(campaigns::scheduled_at.le(now))
            .load::<DbCampaign>(&mut conn)?
            .into_iter()
            .map(|c| Campaign::try_from(c).map_err(RepositoryError::from))
            .collect()
    }

    fn list_sending_campaigns(&self) -> RepositoryResult<Vec<Campaign>> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;
        campaigns::table
            .filter(campaigns::status.eq(CampaignStatus::Sending.to_string()))
            .load::<DbCampaign>(&mut conn)?
            .into_iter()
            .map(|c| Campaign::try_from(c).map_err(RepositoryError::from))
            .collect()
    }

    fn list_campaign_recipients(
        &self,
        campaign_id: i32,
    ) -> RepositoryResult<Vec<CampaignRecipient>> {
        use crate::schema::campaign_recipients;

        let mut conn = self.conn()?;
        campaign_recipients::table
            .filter(campaign_recipients::campaign_id.eq(campaign_id))
            .order(campaign_recipients::id.asc())
            .load::<DbCampaignRecipient>(&mut conn)?
            .into_iter()
            .map(|r| CampaignRecipient::try_from(r).map_err(RepositoryError::from))
            .collect()
    }
}

impl CampaignWriter for DieselRepository {
    fn create_campaign(&self, campaign: &NewCampaign) -> RepositoryResult<Campaign> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;
        let insertable: DbNewCampaign = campaign.into();

        let created = diesel::insert_into(campaigns::table)
            .values(&insertable)
            .get_result::<DbCampaign>(&mut conn)?;

        Campaign::try_from(created).map_err(RepositoryError::from)
    }

    fn set_campaign_status(
        &self,
        campaign_id: i32,
        status: CampaignStatus,
        scheduled_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Campaign> {
        use crate::schema::campaigns;

        let mut conn = self.conn()?;

        let updated = diesel::update(campaigns::table.find(campaign_id))
            .set((
                campaigns::status.eq(status.to_string()),
                campaigns::scheduled_at.eq(scheduled_at),
                campaigns::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbCampaign>(&mut conn)?;

        Campaign::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_campaign(&self, campaign_id: i32) -> RepositoryResult<()> {
        use crate::schema::{campaign_recipients, campaigns};

        let mut conn = self.conn()?;

        diesel::delete(
            campaign_recipients::table
                .filter(campaign_recipients::campaign_id.eq(campaign_id)),
        )
        .execute(&mut conn)?;
        diesel::delete(campaigns::table.find(campaign_id)).execute(&mut conn)?;

        Ok(())
    }

    fn add_campaign_recipients(
        &self,
        recipients: &[NewCampaignRecipient],
    ) -> RepositoryResult<usize> {
        use crate::schema::campaign_recipients;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewCampaignRecipient> =
            recipients.iter().map(|r| r.into()).collect();

        let inserted = diesel::insert_into(campaign_recipients::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(inserted)
    }

    fn mark_campaign_recipient(
        &self,
        recipient_id: i32,
        status: RecipientStatus,
        error: Option<&str>,
        sent_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<()> {
        use crate::schema::campaign_recipients;

        let mut conn = self.conn()?;
        diesel::update(campaign_recipients::table.find(recipient_id))
            .set((
                campaign_recipients::status.eq(status.to_string()),
                campaign_recipients::error.eq(error),
                campaign_recipients::sent_at.eq(sent_at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
