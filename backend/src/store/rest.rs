//! REST gateway store
//!
//! Talks to the hosted PostgREST-style gateway (`/rest/v1/<table>`) that
//! fronts the marketplace database. Filters use the `column=eq.value` syntax
//! and related rows are embedded with `select=...,users(...)`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{
    CustomerRecord, LinkedUser, OwnerBooking, PaymentStatus, ProfileUpdate, ProviderFields,
    ProviderId, ProviderRecord, ReservationId, ReservationRecord, ServiceCategory, ServiceDetail,
    Visit, VisitId,
};
use uuid::Uuid;

use super::{BookingStore, OwnerStore, ProviderStore, StoreError};

const OWNER_SELECT: &str =
    "owner_id,owner_type,visible,accept,description,rate,created_at,users(id,name,email,phone,city)";
const BOOKING_SELECT: &str =
    "reservations_id,reservation_date,price,status,describtion,created_at";
const CUSTOMER_SELECT: &str = "id,name,email,phone,city,verified,created_at";
const RESERVATION_SELECT: &str =
    "reservations_id,price,status,describtion,created_at,users!reservations_user_id_fkey(name,email)";

/// Store client for the REST gateway
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct OwnerJson {
    owner_id: i64,
    owner_type: Option<String>,
    visible: Option<bool>,
    accept: Option<bool>,
    description: Option<String>,
    rate: Option<Decimal>,
    created_at: DateTime<Utc>,
    users: Option<LinkedUser>,
}

impl From<OwnerJson> for ProviderRecord {
    fn from(row: OwnerJson) -> Self {
        ProviderRecord {
            owner_id: row.owner_id,
            owner_type: row.owner_type,
            visible: row.visible.unwrap_or(false),
            accept: row.accept,
            description: row.description,
            rate: row.rate,
            created_at: row.created_at,
            user: row.users,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwnerUserJson {
    user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct BookingJson {
    reservations_id: i64,
    reservation_date: Option<NaiveDate>,
    price: Option<Decimal>,
    status: Option<bool>,
    describtion: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BookingJson> for OwnerBooking {
    fn from(row: BookingJson) -> Self {
        OwnerBooking {
            id: row.reservations_id,
            reservation_date: row.reservation_date,
            price: row.price.unwrap_or(Decimal::ZERO),
            description: row.describtion.unwrap_or_default(),
            status: PaymentStatus::from_flag(row.status),
            requested_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReservationJson {
    reservations_id: i64,
    price: Option<Decimal>,
    status: Option<bool>,
    describtion: Option<String>,
    created_at: DateTime<Utc>,
    users: Option<ReservationCustomer>,
}

#[derive(Debug, Deserialize)]
struct ReservationCustomer {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Serialize)]
struct VerifiedPatch {
    verified: bool,
}

#[derive(Serialize)]
struct ReservationStatusPatch {
    status: bool,
}

#[derive(Serialize)]
struct AcceptPatch {
    accept: bool,
}

#[derive(Serialize)]
struct DescriptionPatch<'a> {
    description: &'a str,
}

#[derive(Serialize)]
struct UserProfilePatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
}

impl<'a> From<&'a ProfileUpdate> for UserProfilePatch<'a> {
    fn from(update: &'a ProfileUpdate) -> Self {
        Self {
            name: update.name.as_deref(),
            phone: update.phone.as_deref(),
            city: update.city.as_deref(),
        }
    }
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .authorized(self.client.get(self.table_url(table)))
            .query(query)
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// PATCH or DELETE rows matching `column=eq.id`, requiring at least one match
    async fn write_rows(
        &self,
        request: RequestBuilder,
        table: &'static str,
        id: String,
    ) -> Result<(), StoreError> {
        self.write_returning::<serde_json::Value>(request, table, id)
            .await
            .map(|_| ())
    }

    /// Like `write_rows`, decoding the first written row
    async fn write_returning<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        table: &'static str,
        id: String,
    ) -> Result<T, StoreError> {
        let response = self
            .authorized(request)
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        let rows: Vec<T> = serde_json::from_str(&body)?;
        rows.into_iter()
            .next()
            .ok_or(StoreError::RowNotFound { table, id })
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("REST gateway returned {}: {}", status, body);
    Err(StoreError::Gateway {
        status: status.as_u16(),
        body,
    })
}

fn eq(value: impl ToString) -> String {
    format!("eq.{}", value.to_string())
}

#[async_trait]
impl ProviderStore for RestStore {
    async fn fetch_providers(&self) -> Result<Vec<ProviderRecord>, StoreError> {
        let rows: Vec<OwnerJson> = self
            .get_rows(
                "owners",
                &[
                    ("select", OWNER_SELECT.to_string()),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().map(ProviderRecord::from).collect())
    }

    async fn fetch_provider(&self, id: ProviderId) -> Result<Option<ProviderRecord>, StoreError> {
        let rows: Vec<OwnerJson> = self
            .get_rows(
                "owners",
                &[
                    ("select", OWNER_SELECT.to_string()),
                    ("owner_id", eq(id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next().map(ProviderRecord::from))
    }

    async fn fetch_service_detail(
        &self,
        id: ProviderId,
        category: ServiceCategory,
    ) -> Result<Option<ServiceDetail>, StoreError> {
        let rows: Vec<serde_json::Value> = self
            .get_rows(
                category.table(),
                &[
                    ("select", "*".to_string()),
                    ("owner_id", eq(id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        rows.into_iter()
            .next()
            .map(|row| ServiceDetail::from_row(category, row))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn update_provider_fields(
        &self,
        id: ProviderId,
        fields: ProviderFields,
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(self.table_url("owners"))
            .query(&[("owner_id", eq(id))])
            .json(&fields);
        self.write_rows(request, "owners", id.to_string()).await
    }

    async fn delete_provider(&self, id: ProviderId) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(self.table_url("owners"))
            .query(&[("owner_id", eq(id))]);
        self.write_rows(request, "owners", id.to_string()).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.get(format!("{}/rest/v1/", self.base_url)))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl BookingStore for RestStore {
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>, StoreError> {
        self.get_rows(
            "users",
            &[
                ("select", CUSTOMER_SELECT.to_string()),
                ("role", eq("user")),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn fetch_reservations(&self) -> Result<Vec<ReservationRecord>, StoreError> {
        let rows: Vec<ReservationJson> = self
            .get_rows(
                "reservations",
                &[
                    ("select", RESERVATION_SELECT.to_string()),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (customer_name, customer_email) = row
                    .users
                    .map(|u| (u.name, u.email))
                    .unwrap_or((None, None));
                ReservationRecord {
                    reservations_id: row.reservations_id,
                    price: row.price,
                    status: row.status,
                    description: row.describtion,
                    created_at: row.created_at,
                    customer_name,
                    customer_email,
                }
            })
            .collect())
    }

    async fn update_customer_verified(&self, id: Uuid, verified: bool) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(self.table_url("users"))
            .query(&[("id", eq(id))])
            .json(&VerifiedPatch { verified });
        self.write_rows(request, "users", id.to_string()).await
    }

    async fn update_reservation_status(
        &self,
        id: ReservationId,
        completed: bool,
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(self.table_url("reservations"))
            .query(&[("reservations_id", eq(id))])
            .json(&ReservationStatusPatch { status: completed });
        self.write_rows(request, "reservations", id.to_string()).await
    }
}

#[async_trait]
impl OwnerStore for RestStore {
    async fn fetch_visits(&self, owner_id: ProviderId) -> Result<Vec<Visit>, StoreError> {
        self.get_rows(
            "visit",
            &[
                ("select", "*".to_string()),
                ("owner_id", eq(owner_id)),
                ("order", "visit_date.asc,created_at.asc".to_string()),
            ],
        )
        .await
    }

    async fn accept_visit(
        &self,
        owner_id: ProviderId,
        visit_id: VisitId,
    ) -> Result<Visit, StoreError> {
        let request = self
            .client
            .patch(self.table_url("visit"))
            .query(&[("id", eq(visit_id)), ("owner_id", eq(owner_id))])
            .json(&AcceptPatch { accept: true });
        self.write_returning(request, "visit", visit_id.to_string())
            .await
    }

    async fn fetch_owner_bookings(
        &self,
        owner_id: ProviderId,
    ) -> Result<Vec<OwnerBooking>, StoreError> {
        let rows: Vec<BookingJson> = self
            .get_rows(
                "reservations",
                &[
                    ("select", BOOKING_SELECT.to_string()),
                    ("owner_id", eq(owner_id)),
                    (
                        "order",
                        "reservation_date.desc.nullslast,created_at.desc".to_string(),
                    ),
                ],
            )
            .await?;

        Ok(rows.into_iter().map(OwnerBooking::from).collect())
    }

    /// Two PATCHes; the gateway offers no transaction across tables
    async fn update_profile(
        &self,
        owner_id: ProviderId,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError> {
        let owners: Vec<OwnerUserJson> = self
            .get_rows(
                "owners",
                &[
                    ("select", "user_id".to_string()),
                    ("owner_id", eq(owner_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        let owner = owners
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::RowNotFound {
                table: "owners",
                id: owner_id.to_string(),
            })?;

        let user_id = match (update.touches_user(), owner.user_id) {
            (true, None) => {
                return Err(StoreError::RowNotFound {
                    table: "users",
                    id: owner_id.to_string(),
                })
            }
            (touches, user_id) => user_id.filter(|_| touches),
        };

        if let Some(description) = update.description.as_deref() {
            let request = self
                .client
                .patch(self.table_url("owners"))
                .query(&[("owner_id", eq(owner_id))])
                .json(&DescriptionPatch { description });
            self.write_rows(request, "owners", owner_id.to_string())
                .await?;
        }

        if let Some(user_id) = user_id {
            let request = self
                .client
                .patch(self.table_url("users"))
                .query(&[("id", eq(user_id))])
                .json(&UserProfilePatch::from(update));
            self.write_rows(request, "users", user_id.to_string())
                .await?;
        }
        Ok(())
    }
}
