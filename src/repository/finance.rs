use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::finance::{Expense, NewExpense, NewTransaction, Transaction};
use crate::models::finance::{
    Expense as DbExpense, NewExpense as DbNewExpense, NewTransaction as DbNewTransaction,
    Transaction as DbTransaction,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, FinanceReader, FinanceWriter};

impl FinanceReader for DieselRepository {
    fn list_transactions(
        &self,
        church_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Transaction>> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;

        let mut query = transactions::table
            .filter(transactions::church_id.eq(church_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(from) = from {
            query = query.filter(transactions::received_at.ge(from));
        }
        if let Some(to) = to {
            query = query.filter(transactions::received_at.le(to));
        }

        let transactions = query
            .order(transactions::received_at.desc())
            .load::<DbTransaction>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(transactions)
    }

    fn list_expenses(
        &self,
        church_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Expense>> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;

        let mut query = expenses::table
            .filter(expenses::church_id.eq(church_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(from) = from {
            query = query.filter(expenses::incurred_at.ge(from));
        }
        if let Some(to) = to {
            query = query.filter(expenses::incurred_at.le(to));
        }

        let expenses = query
            .order(expenses::incurred_at.desc())
            .load::<DbExpense>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(expenses)
    }
}

impl FinanceWriter for DieselRepository {
    fn create_transaction(&self, tx: &NewTransaction) -> RepositoryResult<Transaction> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;
        let insertable: DbNewTransaction = tx.into();

        let created = diesel::insert_into(transactions::table)
            .values(&insertable)
            .get_result::<DbTransaction>(&mut conn)?;

        Ok(created.into())
    }

    fn create_expense(&self, expense: &NewExpense) -> RepositoryResult<Expense> {
        use crate::schema::expenses;

        let mut conn = self.conn()?;
        let insertable: DbNewExpense = expense.into();

        let created = diesel::insert_into(expenses::table)
            .values(&insertable)
            .get_result::<DbExpense>(&mut conn)?;

        Ok(created.into())
    }
}
