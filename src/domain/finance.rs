//! Recorded giving and spending, and the report shapes derived from them.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: i32,
    pub church_id: i32,
    pub contact_id: Option<i32>,
    pub amount_cents: i64,
    pub fund: String,
    pub method: String,
    pub received_at: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTransaction {
    pub church_id: i32,
    pub contact_id: Option<i32>,
    pub amount_cents: i64,
    pub fund: String,
    pub method: String,
    pub received_at: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: i32,
    pub church_id: i32,
    pub category: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub incurred_at: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewExpense {
    pub church_id: i32,
    pub category: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub incurred_at: NaiveDate,
}

/// Date-ranged income/expense roll-up for the finance report.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FinancialSummary {
    pub income_cents: i64,
    pub expense_cents: i64,
    pub net_cents: i64,
    pub income_by_fund: BTreeMap<String, i64>,
    pub expense_by_category: BTreeMap<String, i64>,
    pub transaction_count: i64,
}

/// Congregation-wide counters for the people report.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PeopleReport {
    pub total_contacts: i64,
    pub by_lifecycle: BTreeMap<String, i64>,
    pub group_count: i64,
    pub attendance_last_30_days: i64,
    pub planned_visits_open: i64,
}
