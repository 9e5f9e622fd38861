//! Integration tests for delivery window calculation

use jiff::{
    ToSpan,
    civil::{Date, Weekday, date},
};
use testresult::TestResult;

use tiffin::{
    delivery::{DeliveryError, DeliveryWindow, compute_end_date, end_date_for, is_delivery_day},
    plans::PlanTier,
};

fn qualifying_days(start: Date, end: Date) -> usize {
    start
        .series(1.day())
        .skip(1)
        .take_while(|day| *day <= end)
        .filter(|day| day.weekday() != Weekday::Sunday)
        .count()
}

#[test]
fn every_start_in_a_year_counts_exactly_the_plan_days() -> TestResult {
    for start in date(2024, 1, 1).series(1.day()).take(366) {
        for plan in PlanTier::ALL {
            let end = compute_end_date(start, plan)?;
            let expected = usize::try_from(plan.delivery_days())?;

            assert!(end > start, "{plan} from {start} ended on {end}");
            assert_eq!(
                qualifying_days(start, end),
                expected,
                "{plan} from {start} ended on {end}"
            );
            assert!(is_delivery_day(end), "{plan} from {start} ended on a Sunday");
        }
    }

    Ok(())
}

#[test]
fn computation_is_idempotent() -> TestResult {
    let start = date(2024, 2, 27);

    let first = compute_end_date(start, PlanTier::Monthly)?;
    let second = compute_end_date(start, PlanTier::Monthly)?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn weekly_window_from_saturday() -> TestResult {
    assert_eq!(end_date_for("2024-06-01", "Weekly")?, "2024-06-08");

    Ok(())
}

#[test]
fn plan_names_are_matched_in_any_casing() -> TestResult {
    assert_eq!(end_date_for("2024-06-01", "monthly")?, "2024-06-29");
    assert_eq!(end_date_for("2024-06-01", " WEEKLY ")?, "2024-06-08");

    Ok(())
}

#[test]
fn unknown_plans_are_rejected() {
    let result = end_date_for("2024-06-01", "fortnightly");

    assert!(
        matches!(result, Err(DeliveryError::InvalidPlan(_))),
        "expected InvalidPlan, got {result:?}"
    );
}

#[test]
fn windows_spanning_leap_day() -> TestResult {
    // Thursday 2024-02-22: 23, 24, (25 Sun), 26, 27, 28, 29
    let end = compute_end_date(date(2024, 2, 22), PlanTier::Weekly)?;

    assert_eq!(end, date(2024, 2, 29));

    Ok(())
}

#[test]
fn plan_window_contains_its_own_ends() -> TestResult {
    let window = DeliveryWindow::for_plan(date(2024, 6, 3), PlanTier::Weekly)?;

    assert!(window.contains(window.start()), "start should be inside");
    assert!(window.contains(window.end()), "end should be inside");
    assert!(!window.contains(window.end().tomorrow()?), "day after end is outside");

    Ok(())
}
