//! Weekly schedule aggregation: the Monday–Saturday grid of classes with
//! their booking counts.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::models::ClassWithSpots;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct WeekDay {
    #[schema(value_type = String, format = "date", example = "2026-08-31")]
    pub date: NaiveDate,
    /// Full English weekday name, e.g. "Monday".
    pub weekday_label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeekSchedule {
    pub week_days: Vec<WeekDay>,
    #[schema(value_type = Object)]
    pub classes_by_date: BTreeMap<NaiveDate, Vec<ClassWithSpots>>,
}

/// Monday of `today`'s week and the Saturday five days later.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(5))
}

/// The six labeled days of the week starting at `monday`.
pub fn week_days(monday: NaiveDate) -> Vec<WeekDay> {
    (0..6)
        .map(|offset| {
            let date = monday + Duration::days(offset);
            WeekDay {
                date,
                weekday_label: date.format("%A").to_string(),
            }
        })
        .collect()
}

/// Group classes by calendar date; within a date, insertion order follows
/// the caller's ordering.
pub fn group_by_date(
    classes: Vec<ClassWithSpots>,
) -> BTreeMap<NaiveDate, Vec<ClassWithSpots>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<ClassWithSpots>> = BTreeMap::new();
    for class in classes {
        grouped.entry(class.date).or_default().push(class);
    }
    grouped
}

/// All classes with `date` in `[start, end]` inclusive, each carrying its
/// booking count. Classes with no bookings appear with `booked_spots` 0.
pub async fn classes_between(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ClassWithSpots>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ClassWithSpots>(
        "SELECT c.id, c.title, c.description, c.date, c.start_time, \
                c.duration_minutes, c.max_spots, COUNT(b.id) AS booked_spots \
         FROM classes c \
         LEFT JOIN bookings b ON b.class_id = c.id \
         WHERE c.date BETWEEN ? AND ? \
         GROUP BY c.id \
         ORDER BY c.date, c.start_time",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(ClassWithSpots::annotate_times)
        .collect())
}

/// Assemble the week view for the week containing `today`.
pub async fn week_schedule(
    pool: &SqlitePool,
    today: NaiveDate,
) -> Result<WeekSchedule, sqlx::Error> {
    let (monday, saturday) = week_bounds(today);
    let classes = classes_between(pool, monday, saturday).await?;
    Ok(WeekSchedule {
        week_days: week_days(monday),
        classes_by_date: group_by_date(classes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(id: i64, date: NaiveDate, start_time: i64) -> ClassWithSpots {
        ClassWithSpots {
            id,
            title: format!("Class {id}"),
            description: None,
            date,
            start_time: Some(start_time),
            duration_minutes: Some(60),
            max_spots: 10,
            booked_spots: 0,
            start_time_str: String::new(),
            end_time_str: String::new(),
        }
    }

    #[test]
    fn test_week_bounds_mid_week() {
        // 2026-08-27 is a Thursday
        let thursday = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        let (monday, saturday) = week_bounds(thursday);
        assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        assert_eq!(saturday, NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
    }

    #[test]
    fn test_week_bounds_on_monday() {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let (start, end) = week_bounds(monday);
        assert_eq!(start, monday);
        assert_eq!(end, monday + Duration::days(5));
    }

    #[test]
    fn test_week_days_labels() {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let days = week_days(monday);
        assert_eq!(days.len(), 6);
        assert_eq!(days[0].weekday_label, "Monday");
        assert_eq!(days[5].weekday_label, "Saturday");
        assert_eq!(days[5].date, NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
    }

    #[test]
    fn test_group_by_date_keeps_order_within_day() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let next = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let classes = vec![
            class(1, day, 8 * 3600),
            class(2, day, 10 * 3600),
            class(3, next, 9 * 3600),
        ];
        let grouped = group_by_date(classes);
        assert_eq!(grouped.len(), 2);
        let monday_ids: Vec<i64> = grouped[&day].iter().map(|c| c.id).collect();
        assert_eq!(monday_ids, vec![1, 2]);
        assert_eq!(grouped[&next].len(), 1);
    }
}
