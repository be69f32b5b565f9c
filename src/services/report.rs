//! Financial and people report aggregation.

use chrono::{Duration, NaiveDate, Utc};

use crate::domain::finance::{FinancialSummary, PeopleReport};
use crate::repository::{
    AttendanceReader, ContactReader, FinanceReader, GroupReader, VisitReader,
};
use crate::services::ServiceResult;

/// Date-ranged income/expense roll-up with per-fund and per-category splits.
pub fn financial_summary<R>(
    repo: &R,
    church_id: i32,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> ServiceResult<FinancialSummary>
where
    R: FinanceReader + ?Sized,
{
    let transactions = repo.list_transactions(church_id, from, to)?;
    let expenses = repo.list_expenses(church_id, from, to)?;

    let mut summary = FinancialSummary {
        transaction_count: transactions.len() as i64,
        ..FinancialSummary::default()
    };

    for tx in &transactions {
        summary.income_cents += tx.amount_cents;
        *summary.income_by_fund.entry(tx.fund.clone()).or_insert(0) += tx.amount_cents;
    }
    for expense in &expenses {
        summary.expense_cents += expense.amount_cents;
        *summary
            .expense_by_category
            .entry(expense.category.clone())
            .or_insert(0) += expense.amount_cents;
    }
    summary.net_cents = summary.income_cents - summary.expense_cents;

    Ok(summary)
}

/// Congregation snapshot for the people report page.
pub fn people_report<R>(repo: &R, church_id: i32) -> ServiceResult<PeopleReport>
where
    R: ContactReader + GroupReader + AttendanceReader + VisitReader + ?Sized,
{
    let by_lifecycle = repo.count_contacts_by_lifecycle(church_id)?;
    let thirty_days_ago = Utc::now().naive_utc() - Duration::days(30);

    let mut report = PeopleReport {
        group_count: repo.count_groups(church_id)?,
        attendance_last_30_days: repo.count_attendance_since(church_id, thirty_days_ago)?,
        planned_visits_open: repo.count_open_visits(church_id)?,
        ..PeopleReport::default()
    };

    for (lifecycle, count) in by_lifecycle {
        report.total_contacts += count;
        report.by_lifecycle.insert(lifecycle, count);
    }

    Ok(report)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::finance::{Expense, Transaction};
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

    fn tx(amount: i64, fund: &str) -> Transaction {
        Transaction {
            id: 1,
            church_id: 1,
            contact_id: None,
            amount_cents: amount,
            fund: fund.to_string(),
            method: "card".to_string(),
            received_at: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            created_at: Utc::now().naive_utc(),
        }
    }

    fn expense(amount: i64, category: &str) -> Expense {
        Expense {
            id: 1,
            church_id: 1,
            category: category.to_string(),
            amount_cents: amount,
            description: None,
            incurred_at: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn financial_summary_totals_and_groups() {
        let mut repo = MockRepository::new();
        repo.expect_list_transactions().returning(|_, _, _| {
            Ok(vec![tx(10_000, "general"), tx(5_000, "missions"), tx(2_500, "general")])
        });
        repo.expect_list_expenses()
            .returning(|_, _, _| Ok(vec![expense(4_000, "utilities")]));

        let summary = financial_summary(&repo, 1, None, None).unwrap();

        assert_eq!(summary.income_cents, 17_500);
        assert_eq!(summary.expense_cents, 4_000);
        assert_eq!(summary.net_cents, 13_500);
        assert_eq!(summary.income_by_fund["general"], 12_500);
        assert_eq!(summary.income_by_fund["missions"], 5_000);
        assert_eq!(summary.expense_by_category["utilities"], 4_000);
        assert_eq!(summary.transaction_count, 3);
    }

    #[test]
    fn people_report_combines_counters() {
        let mut repo = MockRepository::new();
        repo.expect_count_contacts_by_lifecycle().returning(|_| {
            Ok(vec![("member".to_string(), 120), ("visitor".to_string(), 30)])
        });
        repo.expect_count_groups().returning(|_| Ok(8));
        repo.expect_count_attendance_since().returning(|_, _| Ok(340));
        repo.expect_count_open_visits().returning(|_| Ok(5));

        let report = people_report(&repo, 1).unwrap();

        assert_eq!(report.total_contacts, 150);
        assert_eq!(report.by_lifecycle["member"], 120);
        assert_eq!(report.group_count, 8);
        assert_eq!(report.attendance_last_30_days, 340);
        assert_eq!(report.planned_visits_open, 5);
    }
}
