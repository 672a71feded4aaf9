use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::timefmt::{format_clock, format_time_range};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A class row annotated with its current booking count, the shape every
/// schedule and booking query returns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct ClassWithSpots {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, format = "date", example = "2026-08-31")]
    pub date: NaiveDate,
    /// Seconds since midnight.
    pub start_time: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub max_spots: i64,
    pub booked_spots: i64,
    #[sqlx(default)]
    pub start_time_str: String,
    #[sqlx(default)]
    pub end_time_str: String,
}

impl ClassWithSpots {
    /// Fill in the display time range from `start_time` and `duration_minutes`.
    pub fn annotate_times(mut self) -> Self {
        let (start, end) = format_time_range(self.start_time, self.duration_minutes);
        self.start_time_str = start;
        self.end_time_str = end;
        self
    }

    pub fn is_full(&self) -> bool {
        self.booked_spots >= self.max_spots
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A booking joined with the class it reserves, used by the my-classes and
/// admin listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookingWithClass {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub class_title: String,
    #[schema(value_type = String, format = "date", example = "2026-08-31")]
    pub class_date: NaiveDate,
    pub class_start_time: Option<i64>,
    #[sqlx(default)]
    pub class_time_str: String,
}

impl BookingWithClass {
    pub fn annotate_time(mut self) -> Self {
        self.class_time_str = self.class_start_time.map(format_clock).unwrap_or_default();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRow {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}
