//! Message templates and outbound campaigns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::text_enum;

text_enum!(
    /// Delivery channel of a template or campaign.
    Channel {
        Email => "email",
        Sms => "sms",
        Whatsapp => "whatsapp",
        Push => "push",
    }
);

text_enum!(
    CampaignStatus {
        Draft => "draft",
        Scheduled => "scheduled",
        Sending => "sending",
        Completed => "completed",
    }
);

text_enum!(
    RecipientStatus {
        Pending => "pending",
        Sent => "sent",
        Failed => "failed",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: i32,
    pub church_id: i32,
    pub name: String,
    pub channel: Channel,
    pub subject: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTemplate {
    pub church_id: i32,
    pub name: String,
    pub channel: Channel,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: i32,
    pub church_id: i32,
    pub template_id: i32,
    pub name: String,
    pub channel: Channel,
    pub status: CampaignStatus,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCampaign {
    pub church_id: i32,
    pub template_id: i32,
    pub name: String,
    pub channel: Channel,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_by: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CampaignRecipient {
    pub id: i32,
    pub campaign_id: i32,
    pub contact_id: i32,
    pub address: String,
    pub status: RecipientStatus,
    pub error: Option<String>,
    pub sent_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCampaignRecipient {
    pub campaign_id: i32,
    pub contact_id: i32,
    pub address: String,
}

/// Per-campaign delivery counters shown on the campaign detail page.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignMetrics {
    pub total_recipients: i64,
    pub pending_count: i64,
    pub sent_count: i64,
    pub failed_count: i64,
}

/// Dashboard-level counters across all campaigns and templates.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CommsMetrics {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub scheduled_campaigns: i64,
    pub completed_campaigns: i64,
    pub total_templates: i64,
}
