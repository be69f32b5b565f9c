//! Diesel models for templates, campaigns and their recipients.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comms::{
    Campaign as DomainCampaign, CampaignRecipient as DomainCampaignRecipient, CampaignStatus,
    Channel, NewCampaign as DomainNewCampaign,
    NewCampaignRecipient as DomainNewCampaignRecipient, NewTemplate as DomainNewTemplate,
    RecipientStatus, Template as DomainTemplate, UpdateTemplate as DomainUpdateTemplate,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::templates)]
pub struct Template {
    pub id: i32,
    pub church_id: i32,
    pub name: String,
    pub channel: String,
    pub subject: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::templates)]
pub struct NewTemplate<'a> {
    pub church_id: i32,
    pub name: &'a str,
    pub channel: String,
    pub subject: &'a str,
    pub body: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::templates)]
pub struct UpdateTemplate<'a> {
    pub name: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(table_name = crate::schema::campaigns)]
#[diesel(belongs_to(Template, foreign_key = template_id))]
pub struct Campaign {
    pub id: i32,
    pub church_id: i32,
    pub template_id: i32,
    pub name: String,
    pub channel: String,
    pub status: String,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::campaigns)]
pub struct NewCampaign<'a> {
    pub church_id: i32,
    pub template_id: i32,
    pub name: &'a str,
    pub channel: String,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_by: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(table_name = crate::schema::campaign_recipients)]
#[diesel(belongs_to(Campaign, foreign_key = campaign_id))]
pub struct CampaignRecipient {
    pub id: i32,
    pub campaign_id: i32,
    pub contact_id: i32,
    pub address: String,
    pub status: String,
    pub error: Option<String>,
    pub sent_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::campaign_recipients)]
pub struct NewCampaignRecipient<'a> {
    pub campaign_id: i32,
    pub contact_id: i32,
    pub address: &'a str,
}

impl TryFrom<Template> for DomainTemplate {
    type Error = TypeConstraintError;

    fn try_from(template: Template) -> Result<Self, Self::Error> {
        Ok(Self {
            id: template.id,
            church_id: template.church_id,
            name: template.name,
            channel: template.channel.parse::<Channel>()?,
            subject: template.subject,
            body: template.body,
            created_at: template.created_at,
            updated_at: template.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewTemplate> for NewTemplate<'a> {
    fn from(template: &'a DomainNewTemplate) -> Self {
        Self {
            church_id: template.church_id,
            name: &template.name,
            channel: template.channel.to_string(),
            subject: &template.subject,
            body: &template.body,
        }
    }
}

impl<'a> From<&'a DomainUpdateTemplate> for UpdateTemplate<'a> {
    fn from(template: &'a DomainUpdateTemplate) -> Self {
        Self {
            name: &template.name,
            subject: &template.subject,
            body: &template.body,
        }
    }
}

impl TryFrom<Campaign> for DomainCampaign {
    type Error = TypeConstraintError;

    fn try_from(campaign: Campaign) -> Result<Self, Self::Error> {
        Ok(Self {
            id: campaign.id,
            church_id: campaign.church_id,
            template_id: campaign.template_id,
            name: campaign.name,
            channel: campaign.channel.parse::<Channel>()?,
            status: campaign.status.parse::<CampaignStatus>()?,
            scheduled_at: campaign.scheduled_at,
            created_by: campaign.created_by,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCampaign> for NewCampaign<'a> {
    fn from(campaign: &'a DomainNewCampaign) -> Self {
        Self {
            church_id: campaign.church_id,
            template_id: campaign.template_id,
            name: &campaign.name,
            channel: campaign.channel.to_string(),
            scheduled_at: campaign.scheduled_at,
            created_by: &campaign.created_by,
        }
    }
}

impl TryFrom<CampaignRecipient> for DomainCampaignRecipient {
    type Error = TypeConstraintError;

    fn try_from(recipient: CampaignRecipient) -> Result<Self, Self::Error> {
        Ok(Self {
            id: recipient.id,
            campaign_id: recipient.campaign_id,
            contact_id: recipient.contact_id,
            address: recipient.address,
            status: recipient.status.parse::<RecipientStatus>()?,
            error: recipient.error,
            sent_at: recipient.sent_at,
        })
    }
}

impl<'a> From<&'a DomainNewCampaignRecipient> for NewCampaignRecipient<'a> {
    fn from(recipient: &'a DomainNewCampaignRecipient) -> Self {
        Self {
            campaign_id: recipient.campaign_id,
            contact_id: recipient.contact_id,
            address: &recipient.address,
        }
    }
}
