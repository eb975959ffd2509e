use chrono::NaiveDate;
use serde::Serialize;

use crate::model::leave::{LeaveRequest, LeaveType, RequestStatus};

#[derive(Debug, Serialize)]
pub struct LeaveBalance {
    pub leave_type: &'static str,
    pub entitled: i64,
    pub used: i64,
    pub remaining: i64,
}

/// Calendar days a request spans, both endpoints inclusive.
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Approved days consumed for one leave type. Pending and rejected
/// requests never count.
pub fn used_days(requests: &[LeaveRequest], leave_type: LeaveType) -> i64 {
    requests
        .iter()
        .filter(|r| {
            r.status == RequestStatus::Approved.as_str() && r.leave_type == leave_type.as_str()
        })
        .map(|r| span_days(r.start_date, r.end_date))
        .sum()
}

/// Balance for every leave type. `remaining` goes negative when approvals
/// exceed the entitlement and is reported as-is.
pub fn compute_balances(requests: &[LeaveRequest]) -> Vec<LeaveBalance> {
    LeaveType::ALL
        .iter()
        .map(|lt| {
            let entitled = lt.entitled_days();
            let used = used_days(requests, *lt);
            LeaveBalance {
                leave_type: lt.as_str(),
                entitled,
                used,
                remaining: entitled - used,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(leave_type: &str, status: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> LeaveRequest {
        LeaveRequest {
            id: 0,
            user_id: 7,
            user_name: "Sara Malik".to_string(),
            leave_type: leave_type.to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            reason: "family event".to_string(),
            status: status.to_string(),
            created_at: None,
        }
    }

    fn balance_for(balances: &[LeaveBalance], leave_type: &str) -> (i64, i64, i64) {
        let b = balances.iter().find(|b| b.leave_type == leave_type).unwrap();
        (b.entitled, b.used, b.remaining)
    }

    #[test]
    fn span_is_inclusive_on_both_ends() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(span_days(start, start), 1);
        assert_eq!(span_days(start, NaiveDate::from_ymd_opt(2026, 3, 6).unwrap()), 5);
    }

    #[test]
    fn five_approved_annual_days_leave_nine() {
        let requests = vec![req("Annual", "Approved", (2026, 3, 2), (2026, 3, 6))];
        let balances = compute_balances(&requests);
        assert_eq!(balance_for(&balances, "Annual"), (14, 5, 9));
    }

    #[test]
    fn pending_and_rejected_do_not_consume() {
        let requests = vec![
            req("Sick", "Pending", (2026, 4, 1), (2026, 4, 3)),
            req("Sick", "Rejected", (2026, 5, 1), (2026, 5, 2)),
        ];
        let balances = compute_balances(&requests);
        assert_eq!(balance_for(&balances, "Sick"), (10, 0, 10));
    }

    #[test]
    fn types_are_tallied_separately() {
        let requests = vec![
            req("Sick", "Approved", (2026, 2, 9), (2026, 2, 10)),
            req("Casual", "Approved", (2026, 2, 16), (2026, 2, 16)),
        ];
        let balances = compute_balances(&requests);
        assert_eq!(balance_for(&balances, "Sick"), (10, 2, 8));
        assert_eq!(balance_for(&balances, "Casual"), (10, 1, 9));
        assert_eq!(balance_for(&balances, "Annual"), (14, 0, 14));
    }

    #[test]
    fn overdrawn_balance_goes_negative() {
        let requests = vec![
            req("Sick", "Approved", (2026, 1, 5), (2026, 1, 11)),
            req("Sick", "Approved", (2026, 6, 1), (2026, 6, 5)),
        ];
        let balances = compute_balances(&requests);
        assert_eq!(balance_for(&balances, "Sick"), (10, 12, -2));
    }

    #[test]
    fn spans_across_months_count_calendar_days() {
        let requests = vec![req("Annual", "Approved", (2026, 1, 30), (2026, 2, 2))];
        let balances = compute_balances(&requests);
        assert_eq!(balance_for(&balances, "Annual"), (14, 4, 10));
    }
}
