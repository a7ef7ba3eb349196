use crate::reporting::DashboardCounts;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    /// Report as of this date instead of the clock's today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub reference_date: NaiveDate,
    #[serde(flatten)]
    pub counts: DashboardCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_are_top_level_fields() {
        let response = StatsResponse {
            reference_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            counts: DashboardCounts {
                due_today: 2,
                overdue: 1,
                due_tomorrow: 0,
                completed_today: 3,
                active_total: 5,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["reference_date"], "2024-03-15");
        assert_eq!(json["due_today"], 2);
        assert_eq!(json["completed_today"], 3);
        assert_eq!(json["active_total"], 5);
    }
}
