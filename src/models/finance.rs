use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::finance::{
    Expense as DomainExpense, NewExpense as DomainNewExpense,
    NewTransaction as DomainNewTransaction, Transaction as DomainTransaction,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::transactions)]
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

#[derive(Insertable)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransaction<'a> {
    pub church_id: i32,
    pub contact_id: Option<i32>,
    pub amount_cents: i64,
    pub fund: &'a str,
    pub method: &'a str,
    pub received_at: NaiveDate,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::expenses)]
pub struct Expense {
    pub id: i32,
    pub church_id: i32,
    pub category: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub incurred_at: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::expenses)]
pub struct NewExpense<'a> {
    pub church_id: i32,
    pub category: &'a str,
    pub amount_cents: i64,
    pub description: Option<&'a str>,
    pub incurred_at: NaiveDate,
}

impl From<Transaction> for DomainTransaction {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            church_id: tx.church_id,
            contact_id: tx.contact_id,
            amount_cents: tx.amount_cents,
            fund: tx.fund,
            method: tx.method,
            received_at: tx.received_at,
            created_at: tx.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewTransaction> for NewTransaction<'a> {
    fn from(tx: &'a DomainNewTransaction) -> Self {
        Self {
            church_id: tx.church_id,
            contact_id: tx.contact_id,
            amount_cents: tx.amount_cents,
            fund: &tx.fund,
            method: &tx.method,
            received_at: tx.received_at,
        }
    }
}

impl From<Expense> for DomainExpense {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            church_id: expense.church_id,
            category: expense.category,
            amount_cents: expense.amount_cents,
            description: expense.description,
            incurred_at: expense.incurred_at,
            created_at: expense.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewExpense> for NewExpense<'a> {
    fn from(expense: &'a DomainNewExpense) -> Self {
        Self {
            church_id: expense.church_id,
            category: &expense.category,
            amount_cents: expense.amount_cents,
            description: expense.description.as_deref(),
            incurred_at: expense.incurred_at,
        }
    }
}
