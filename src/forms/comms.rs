use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::comms::{CampaignStatus, Channel, NewCampaign, NewTemplate, UpdateTemplate};

#[derive(Deserialize, Validate)]
pub struct AddTemplateForm {
    #[validate(length(min = 1))]
    pub name: String,
    pub channel: Channel,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
}

impl AddTemplateForm {
    pub fn into_domain(self, church_id: i32) -> NewTemplate {
        NewTemplate {
            church_id,
            name: self.name,
            channel: self.channel,
            subject: self.subject,
            body: ammonia::clean(&self.body),
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct SaveTemplateForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
}

impl From<SaveTemplateForm> for UpdateTemplate {
    fn from(form: SaveTemplateForm) -> Self {
        UpdateTemplate {
            name: form.name,
            subject: form.subject,
            body: ammonia::clean(&form.body),
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct AddCampaignForm {
    pub template_id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    pub channel: Channel,
    pub scheduled_at: Option<NaiveDateTime>,
}

impl AddCampaignForm {
    pub fn into_domain(self, church_id: i32, created_by: &str) -> NewCampaign {
        NewCampaign {
            church_id,
            template_id: self.template_id,
            name: self.name,
            channel: self.channel,
            scheduled_at: self.scheduled_at,
            created_by: created_by.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct CampaignListParams {
    pub status: Option<CampaignStatus>,
}

#[derive(Deserialize)]
pub struct ScheduleCampaignForm {
    pub scheduled_at: NaiveDateTime,
}
