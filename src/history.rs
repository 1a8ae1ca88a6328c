use crate::ledger::{retention_start, DayProgress};
use crate::models::{HistoryDay, HistoryMonth, HistoryView};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

/// Lays out every day of the retention window, grouped by calendar month.
/// Days missing from `days` are shown as zero intake.
pub fn build_history_at(today: NaiveDate, days: &[DayProgress], goal: f64) -> HistoryView {
    let start = retention_start(today);
    let by_date: HashMap<NaiveDate, f64> =
        days.iter().map(|day| (day.date, day.current)).collect();

    let mut months: Vec<HistoryMonth> = Vec::new();
    let mut date = start;
    while date <= today {
        let current = by_date.get(&date).copied().unwrap_or(0.0);
        let day = HistoryDay {
            date: date.to_string(),
            current,
            percent: percent_of(current, goal),
            goal_met: goal > 0.0 && current >= goal,
        };

        let label = month_label(date);
        if let Some(month) = months.last_mut().filter(|month| month.label == label) {
            month.days.push(day);
        } else {
            months.push(HistoryMonth {
                label,
                days: vec![day],
            });
        }
        date += Duration::days(1);
    }

    HistoryView {
        goal,
        start_date: start.to_string(),
        end_date: today.to_string(),
        months,
    }
}

fn percent_of(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (current / goal * 100.0).clamp(0.0, 100.0)
}

fn month_label(date: NaiveDate) -> String {
    format!("{} {}", date.format("%B"), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: NaiveDate, current: f64) -> DayProgress {
        DayProgress { date, current }
    }

    #[test]
    fn history_covers_31_days_across_months() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let view = build_history_at(today, &[], 2000.0);

        let total: usize = view.months.iter().map(|month| month.days.len()).sum();
        assert_eq!(total, 31);
        assert_eq!(view.start_date, "2026-02-08");
        assert_eq!(view.end_date, "2026-03-10");

        let labels: Vec<&str> = view.months.iter().map(|month| month.label.as_str()).collect();
        assert_eq!(labels, vec!["February 2026", "March 2026"]);
        assert_eq!(view.months[0].days.len(), 21);
        assert_eq!(view.months[1].days.len(), 10);
    }

    #[test]
    fn history_fills_gaps_with_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let two_days_ago = today - Duration::days(2);
        let view = build_history_at(today, &[day(two_days_ago, 2500.0)], 2000.0);

        let days: Vec<&HistoryDay> = view.months.iter().flat_map(|m| m.days.iter()).collect();
        let logged = days
            .iter()
            .find(|d| d.date == two_days_ago.to_string())
            .expect("missing day");
        assert_eq!(logged.current, 2500.0);
        assert_eq!(logged.percent, 100.0);
        assert!(logged.goal_met);

        let last = days.last().unwrap();
        assert_eq!(last.date, today.to_string());
        assert_eq!(last.current, 0.0);
        assert!(!last.goal_met);
    }

    #[test]
    fn rows_outside_the_window_are_ignored() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let stale = today - Duration::days(45);
        let view = build_history_at(today, &[day(stale, 900.0)], 1800.0);
        assert!(view
            .months
            .iter()
            .flat_map(|m| m.days.iter())
            .all(|d| d.current == 0.0));
    }

    #[test]
    fn half_goal_is_fifty_percent() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let view = build_history_at(today, &[day(today, 1000.0)], 2000.0);
        let last = view.months.last().unwrap().days.last().unwrap();
        assert_eq!(last.percent, 50.0);
    }
}
