//! Postgres store: direct SQL against the marketplace tables

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    CustomerRecord, LinkedUser, OwnerBooking, PaymentStatus, ProfileUpdate, ProviderFields,
    ProviderId, ProviderRecord, ReservationId, ReservationRecord, ServiceCategory, ServiceDetail,
    Visit, VisitId,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::{BookingStore, OwnerStore, ProviderStore, StoreError};

const OWNER_SELECT: &str = r#"
    SELECT o.owner_id, o.owner_type, o.visible, o.accept, o.description, o.rate,
           o.created_at,
           u.id AS user_id, u.name AS user_name, u.email AS user_email,
           u.phone AS user_phone, u.city AS user_city
    FROM owners o
    LEFT JOIN users u ON u.id = o.user_id
"#;

type VisitRow = (i64, i64, NaiveDate, Option<String>, Option<bool>, DateTime<Utc>);

fn visit_from_row(r: VisitRow) -> Visit {
    Visit {
        id: r.0,
        owner_id: r.1,
        visit_date: r.2,
        visit_time: r.3,
        accept: r.4,
        created_at: r.5,
    }
}

/// Store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

/// Owner row joined with its user
#[derive(Debug, sqlx::FromRow)]
struct OwnerRow {
    owner_id: i64,
    owner_type: Option<String>,
    visible: Option<bool>,
    accept: Option<bool>,
    description: Option<String>,
    rate: Option<Decimal>,
    created_at: DateTime<Utc>,
    user_id: Option<Uuid>,
    user_name: Option<String>,
    user_email: Option<String>,
    user_phone: Option<String>,
    user_city: Option<String>,
}

impl From<OwnerRow> for ProviderRecord {
    fn from(row: OwnerRow) -> Self {
        let user = row.user_id.map(|id| LinkedUser {
            id,
            name: row.user_name,
            email: row.user_email,
            phone: row.user_phone,
            city: row.user_city,
        });

        ProviderRecord {
            owner_id: row.owner_id,
            owner_type: row.owner_type,
            visible: row.visible.unwrap_or(false),
            accept: row.accept,
            description: row.description,
            rate: row.rate,
            created_at: row.created_at,
            user,
        }
    }
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProviderStore for PgStore {
    async fn fetch_providers(&self) -> Result<Vec<ProviderRecord>, StoreError> {
        let sql = format!("{} ORDER BY o.created_at DESC", OWNER_SELECT);
        let rows = sqlx::query_as::<_, OwnerRow>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ProviderRecord::from).collect())
    }

    async fn fetch_provider(&self, id: ProviderId) -> Result<Option<ProviderRecord>, StoreError> {
        let sql = format!("{} WHERE o.owner_id = $1", OWNER_SELECT);
        let row = sqlx::query_as::<_, OwnerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(ProviderRecord::from))
    }

    async fn fetch_service_detail(
        &self,
        id: ProviderId,
        category: ServiceCategory,
    ) -> Result<Option<ServiceDetail>, StoreError> {
        // Table names come from the fixed category schema, never from input
        let sql = format!(
            "SELECT row_to_json(t) FROM {} t WHERE t.owner_id = $1 LIMIT 1",
            category.table()
        );

        let row: Option<serde_json::Value> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        row.map(|value| ServiceDetail::from_row(category, value))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn update_provider_fields(
        &self,
        id: ProviderId,
        fields: ProviderFields,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE owners SET visible = $1, accept = $2 WHERE owner_id = $3")
            .bind(fields.visible)
            .bind(fields.accept)
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "owners",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_provider(&self, id: ProviderId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM owners WHERE owner_id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "owners",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>, StoreError> {
        let rows = sqlx::query_as::<
            _,
            (
                Uuid,
                Option<String>,
                Option<String>,
                Option<String>,
                Option<String>,
                Option<bool>,
                DateTime<Utc>,
            ),
        >(
            r#"
            SELECT id, name, email, phone, city, verified, created_at
            FROM users
            WHERE role = 'user'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CustomerRecord {
                id: r.0,
                name: r.1,
                email: r.2,
                phone: r.3,
                city: r.4,
                verified: r.5,
                created_at: r.6,
            })
            .collect())
    }

    async fn fetch_reservations(&self) -> Result<Vec<ReservationRecord>, StoreError> {
        let rows = sqlx::query_as::<
            _,
            (
                i64,
                Option<Decimal>,
                Option<bool>,
                Option<String>,
                DateTime<Utc>,
                Option<String>,
                Option<String>,
            ),
        >(
            r#"
            SELECT r.reservations_id, r.price, r.status, r.describtion, r.created_at,
                   u.name, u.email
            FROM reservations r
            LEFT JOIN users u ON u.id = r.user_id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ReservationRecord {
                reservations_id: r.0,
                price: r.1,
                status: r.2,
                description: r.3,
                created_at: r.4,
                customer_name: r.5,
                customer_email: r.6,
            })
            .collect())
    }

    async fn update_customer_verified(&self, id: Uuid, verified: bool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET verified = $1 WHERE id = $2")
            .bind(verified)
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "users",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn update_reservation_status(
        &self,
        id: ReservationId,
        completed: bool,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE reservations SET status = $1 WHERE reservations_id = $2")
            .bind(completed)
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "reservations",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OwnerStore for PgStore {
    async fn fetch_visits(&self, owner_id: ProviderId) -> Result<Vec<Visit>, StoreError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, owner_id, visit_date, visit_time, accept, created_at
            FROM visit
            WHERE owner_id = $1
            ORDER BY visit_date ASC, created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(visit_from_row).collect())
    }

    async fn accept_visit(
        &self,
        owner_id: ProviderId,
        visit_id: VisitId,
    ) -> Result<Visit, StoreError> {
        let row = sqlx::query_as::<_, VisitRow>(
            r#"
            UPDATE visit SET accept = TRUE
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, visit_date, visit_time, accept, created_at
            "#,
        )
        .bind(visit_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(visit_from_row).ok_or_else(|| StoreError::RowNotFound {
            table: "visit",
            id: visit_id.to_string(),
        })
    }

    async fn fetch_owner_bookings(
        &self,
        owner_id: ProviderId,
    ) -> Result<Vec<OwnerBooking>, StoreError> {
        let rows = sqlx::query_as::<
            _,
            (
                i64,
                Option<NaiveDate>,
                Option<Decimal>,
                Option<bool>,
                Option<String>,
                DateTime<Utc>,
            ),
        >(
            r#"
            SELECT reservations_id, reservation_date, price, status, describtion, created_at
            FROM reservations
            WHERE owner_id = $1
            ORDER BY reservation_date DESC NULLS LAST, created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| OwnerBooking {
                id: r.0,
                reservation_date: r.1,
                price: r.2.unwrap_or(Decimal::ZERO),
                status: PaymentStatus::from_flag(r.3),
                description: r.4.unwrap_or_default(),
                requested_at: r.5,
            })
            .collect())
    }

    async fn update_profile(
        &self,
        owner_id: ProviderId,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await?;

        let user_id: Option<Option<Uuid>> = sqlx::query_scalar(
            r#"
            UPDATE owners SET description = COALESCE($1, description)
            WHERE owner_id = $2
            RETURNING user_id
            "#,
        )
        .bind(update.description.as_deref())
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        let user_id = user_id.ok_or_else(|| StoreError::RowNotFound {
            table: "owners",
            id: owner_id.to_string(),
        })?;

        if update.touches_user() {
            let user_id = user_id.ok_or_else(|| StoreError::RowNotFound {
                table: "users",
                id: owner_id.to_string(),
            })?;
            sqlx::query(
                r#"
                UPDATE users
                SET name = COALESCE($1, name),
                    phone = COALESCE($2, phone),
                    city = COALESCE($3, city)
                WHERE id = $4
                "#,
            )
            .bind(update.name.as_deref())
            .bind(update.phone.as_deref())
            .bind(update.city.as_deref())
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
