//! Database queries for submitted booking requests

use sqlx::PgPool;
use uuid::Uuid;

use crate::booking::submission::{BookingRequest, SubmissionError};

/// Apply pending migrations from `./migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Insert a submitted booking request and return its id
pub async fn insert_booking_request(
    pool: &PgPool,
    request: &BookingRequest,
) -> Result<Uuid, SubmissionError> {
    let id = Uuid::new_v4();
    let booking = &request.booking;
    let estimate = &request.estimate;
    let contact = booking.customer_info.clone().unwrap_or_default();
    let snapshot = serde_json::to_value(booking)?;

    sqlx::query(
        r#"
        INSERT INTO booking_requests (
            id,
            session_id,
            service_id,
            size,
            length,
            add_ons,
            appointment_date,
            appointment_time,
            customer_name,
            customer_phone,
            customer_whatsapp,
            customer_email,
            special_requests,
            currency,
            total_minor,
            deposit_minor,
            duration_minutes,
            status,
            snapshot,
            submitted_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        "#,
    )
    .bind(id)
    .bind(request.session_id)
    .bind(&estimate.service_id)
    .bind(estimate.size.as_str())
    .bind(estimate.length.as_str())
    .bind(&estimate.add_on_ids)
    .bind(booking.selected_date)
    .bind(booking.selected_time.as_deref())
    .bind(&contact.name)
    .bind(contact.phone.as_deref())
    .bind(contact.whatsapp.as_deref())
    .bind(&contact.email)
    .bind(contact.special_requests.as_deref())
    .bind(&request.currency)
    .bind(estimate.total_price.minor_units())
    .bind(estimate.deposit.minor_units())
    .bind(estimate.total_duration_minutes)
    .bind("pending_deposit")
    .bind(snapshot)
    .bind(request.submitted_at)
    .execute(pool)
    .await?;

    Ok(id)
}
