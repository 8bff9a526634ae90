use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_core::booking::{Booking, BookingDetails, BookingStatus, Customer, Traveler};
use wayfare_core::repository::{BookingRepository, RepoResult};
use wayfare_shared::Masked;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    email: String,
    phone: String,
    country_dialing_code: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            email: Masked::new(row.email),
            phone: Masked::new(row.phone),
            country_dialing_code: row.country_dialing_code,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    customer_id: Uuid,
    client_ref: String,
    booking_status: String,
    payment_status: String,
    order_id: Option<String>,
    pnr: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> RepoResult<Booking> {
        Ok(Booking {
            id: self.id,
            customer_id: self.customer_id,
            client_ref: self.client_ref,
            booking_status: self.booking_status.parse()?,
            payment_status: self.payment_status.parse()?,
            order_id: self.order_id,
            pnr: self.pnr,
            created_at: self.created_at,
            modified_at: self.modified_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TravelerRow {
    id: Uuid,
    booking_id: Uuid,
    traveler_id: String,
    traveler_type: String,
    title: Option<String>,
    first_name: String,
    last_name: String,
    gender: String,
    date_of_birth: NaiveDate,
}

impl TravelerRow {
    fn into_traveler(self) -> RepoResult<Traveler> {
        Ok(Traveler {
            id: self.id,
            booking_id: self.booking_id,
            traveler_id: self.traveler_id,
            traveler_type: self.traveler_type.parse()?,
            title: self.title,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            date_of_birth: self.date_of_birth,
        })
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_customer_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, email, phone, country_dialing_code, first_name, last_name, created_at, modified_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn create_booking(
        &self,
        customer: &Customer,
        booking: &Booking,
        travelers: &[Traveler],
    ) -> RepoResult<Uuid> {
        let mut tx = self.pool.begin().await?;

        // An existing email keeps its customer row
        let customer_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO customers (id, email, phone, country_dialing_code, first_name, last_name, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (email) DO UPDATE SET modified_at = EXCLUDED.modified_at
            RETURNING id
            "#,
        )
        .bind(customer.id)
        .bind(customer.email.expose().as_str())
        .bind(customer.phone.expose().as_str())
        .bind(&customer.country_dialing_code)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(customer.created_at)
        .bind(customer.modified_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO flight_bookings (id, customer_id, client_ref, booking_status, payment_status, order_id, pnr, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(booking.id)
        .bind(customer_id)
        .bind(&booking.client_ref)
        .bind(booking.booking_status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(&booking.order_id)
        .bind(&booking.pnr)
        .bind(booking.created_at)
        .bind(booking.modified_at)
        .execute(&mut *tx)
        .await?;

        for traveler in travelers {
            sqlx::query(
                r#"
                INSERT INTO travelers (id, booking_id, traveler_id, traveler_type, title, first_name, last_name, gender, date_of_birth)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(traveler.id)
            .bind(booking.id)
            .bind(&traveler.traveler_id)
            .bind(traveler.traveler_type.as_str())
            .bind(&traveler.title)
            .bind(&traveler.first_name)
            .bind(&traveler.last_name)
            .bind(&traveler.gender)
            .bind(traveler.date_of_birth)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(customer_id)
    }

    async fn get_booking(&self, id: Uuid) -> RepoResult<Option<BookingDetails>> {
        let booking = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, customer_id, client_ref, booking_status, payment_status, order_id, pnr, created_at, modified_at
            FROM flight_bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let booking = match booking {
            Some(row) => row.into_booking()?,
            None => return Ok(None),
        };

        let customer = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, email, phone, country_dialing_code, first_name, last_name, created_at, modified_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(booking.customer_id)
        .fetch_one(&self.pool)
        .await?;

        let travelers = sqlx::query_as::<_, TravelerRow>(
            r#"
            SELECT id, booking_id, traveler_id, traveler_type, title, first_name, last_name, gender, date_of_birth
            FROM travelers
            WHERE booking_id = $1
            ORDER BY length(traveler_id), traveler_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(TravelerRow::into_traveler)
        .collect::<RepoResult<Vec<_>>>()?;

        Ok(Some(BookingDetails {
            booking,
            customer: customer.into(),
            travelers,
        }))
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE flight_bookings
            SET booking_status = $3, modified_at = NOW()
            WHERE id = $1 AND booking_status = $2
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn confirm_booking(
        &self,
        id: Uuid,
        order_id: &str,
        pnr: Option<&str>,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE flight_bookings
            SET booking_status = $2, order_id = $3, pnr = $4, modified_at = NOW()
            WHERE id = $1 AND booking_status = $5
            "#,
        )
        .bind(id)
        .bind(BookingStatus::Confirmed.as_str())
        .bind(order_id)
        .bind(pnr)
        .bind(BookingStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
