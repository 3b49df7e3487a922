//! Venue visit requests customers send to a provider

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProviderId, VisitId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VisitStatus {
    Accepted,
    Awaiting,
}

impl VisitStatus {
    pub fn from_accept(accept: Option<bool>) -> Self {
        if accept == Some(true) {
            VisitStatus::Accepted
        } else {
            VisitStatus::Awaiting
        }
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitStatus::Accepted => f.write_str("Accepted"),
            VisitStatus::Awaiting => f.write_str("Awaiting"),
        }
    }
}

/// Row of the `visit` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    pub id: VisitId,
    pub owner_id: ProviderId,
    pub visit_date: NaiveDate,
    pub visit_time: Option<String>,
    pub accept: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl Visit {
    pub fn status(&self) -> VisitStatus {
        VisitStatus::from_accept(self.accept)
    }
}

/// Calendar order, earliest visit first; same-day requests by arrival
pub fn sort_visits(visits: &mut [Visit]) {
    visits.sort_by(|a, b| {
        a.visit_date
            .cmp(&b.visit_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
