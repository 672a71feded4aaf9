//! Booking creation with the capacity check, plus the booking listings.

use chrono::{NaiveDate, Utc};
use futures::future::try_join;
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::{Booking, BookingWithClass, ClassWithSpots, User};

const CLASS_WITH_SPOTS_SQL: &str =
    "SELECT c.id, c.title, c.description, c.date, c.start_time, \
            c.duration_minutes, c.max_spots, COUNT(b.id) AS booked_spots \
     FROM classes c \
     LEFT JOIN bookings b ON b.class_id = c.id \
     WHERE c.id = ? \
     GROUP BY c.id";

const USER_BOOKINGS_SQL: &str =
    "SELECT b.id, b.class_id, b.user_id, b.full_name, b.email, b.phone, b.created_at, \
            c.title AS class_title, c.date AS class_date, c.start_time AS class_start_time \
     FROM bookings b \
     JOIN classes c ON c.id = b.class_id \
     WHERE b.user_id = ?";

#[derive(Debug, Clone)]
pub enum BookingOutcome {
    /// The booking was written; `class` reflects the new count.
    Booked {
        class: ClassWithSpots,
        booking: Booking,
    },
    /// The class was already at capacity; nothing was written.
    Full { class: ClassWithSpots },
}

/// One class with its current booking count, or `None` for an unknown id.
pub async fn class_with_spots(
    pool: &SqlitePool,
    class_id: i64,
) -> Result<Option<ClassWithSpots>, sqlx::Error> {
    let row = sqlx::query_as::<_, ClassWithSpots>(CLASS_WITH_SPOTS_SQL)
        .bind(class_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(ClassWithSpots::annotate_times))
}

/// Reserve a spot for `user` on `class_id`, copying the contact data from
/// their profile. The capacity check and the insert run in one transaction
/// so two bookings for the last spot cannot both succeed.
pub async fn book(
    pool: &SqlitePool,
    class_id: i64,
    user: &User,
) -> Result<BookingOutcome, ApiError> {
    let mut tx = pool.begin().await?;

    let class = sqlx::query_as::<_, ClassWithSpots>(CLASS_WITH_SPOTS_SQL)
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("class {class_id}")))?
        .annotate_times();

    if class.is_full() {
        return Ok(BookingOutcome::Full { class });
    }

    let booking = sqlx::query_as::<_, Booking>(
        "INSERT INTO bookings (class_id, user_id, full_name, email, phone, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(class_id)
    .bind(user.id)
    .bind(&user.full_name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let mut class = class;
    class.booked_spots += 1;
    Ok(BookingOutcome::Booked { class, booking })
}

/// A user's bookings split into upcoming (class date today or later,
/// soonest first) and past (most recent first).
pub async fn bookings_for_user(
    pool: &SqlitePool,
    user_id: i64,
    today: NaiveDate,
) -> Result<(Vec<BookingWithClass>, Vec<BookingWithClass>), sqlx::Error> {
    let future_sql =
        format!("{USER_BOOKINGS_SQL} AND c.date >= ? ORDER BY c.date, c.start_time");
    let past_sql =
        format!("{USER_BOOKINGS_SQL} AND c.date < ? ORDER BY c.date DESC, c.start_time DESC");

    let future = sqlx::query_as::<_, BookingWithClass>(&future_sql)
        .bind(user_id)
        .bind(today)
        .fetch_all(pool);

    let past = sqlx::query_as::<_, BookingWithClass>(&past_sql)
        .bind(user_id)
        .bind(today)
        .fetch_all(pool);

    let (future, past) = try_join(future, past).await?;
    let annotate = |rows: Vec<BookingWithClass>| -> Vec<BookingWithClass> {
        rows.into_iter()
            .map(BookingWithClass::annotate_time)
            .collect()
    };
    Ok((annotate(future), annotate(past)))
}

/// Every booking in the system joined with its class, newest first.
pub async fn all_bookings(pool: &SqlitePool) -> Result<Vec<BookingWithClass>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BookingWithClass>(
        "SELECT b.id, b.class_id, b.user_id, b.full_name, b.email, b.phone, b.created_at, \
                c.title AS class_title, c.date AS class_date, c.start_time AS class_start_time \
         FROM bookings b \
         JOIN classes c ON c.id = b.class_id \
         ORDER BY b.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(BookingWithClass::annotate_time)
        .collect())
}
