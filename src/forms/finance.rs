use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::finance::{NewExpense, NewTransaction};

#[derive(Deserialize, Validate)]
pub struct AddTransactionForm {
    pub contact_id: Option<i32>,
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    #[validate(length(min = 1))]
    pub fund: String,
    #[validate(length(min = 1))]
    pub method: String,
    pub received_at: NaiveDate,
}

impl AddTransactionForm {
    pub fn into_domain(self, church_id: i32) -> NewTransaction {
        NewTransaction {
            church_id,
            contact_id: self.contact_id,
            amount_cents: self.amount_cents,
            fund: self.fund,
            method: self.method,
            received_at: self.received_at,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct AddExpenseForm {
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    pub description: Option<String>,
    pub incurred_at: NaiveDate,
}

impl AddExpenseForm {
    pub fn into_domain(self, church_id: i32) -> NewExpense {
        NewExpense {
            church_id,
            category: self.category,
            amount_cents: self.amount_cents,
            description: self.description,
            incurred_at: self.incurred_at,
        }
    }
}

#[derive(Deserialize)]
pub struct ReportParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
