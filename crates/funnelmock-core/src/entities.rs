use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::catalog::Product;

/// One simulated individual. Created once, then mutated in place by the
/// driver as sessions progress; never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: String,
    pub cookie_id: String,
    /// Empty until the first purchase backfills it.
    pub email: String,
    pub device_category: String,
    pub geo_country: String,
    pub geo_city: String,
    pub is_customer: bool,
    pub order_count: u32,
}

/// One visit. Attribution fields are stamped at creation from the resolved
/// traffic source; `converted` and `max_funnel_depth` are set at walk end.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub cookie_id: String,
    /// 1-based, strictly increasing and gap-free per user.
    pub session_number: u32,
    pub timestamp: NaiveDateTime,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub landing_page: String,
    pub device_category: String,
    pub geo_country: String,
    pub geo_city: String,
    pub is_paid: bool,
    pub converted: bool,
    pub max_funnel_depth: usize,
}

/// One funnel event. Immutable once created; within a session, timestamps
/// are non-decreasing with `event_index`.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelEvent {
    pub event_id: String,
    pub session_id: String,
    pub user_id: String,
    pub cookie_id: String,
    pub event_name: String,
    pub timestamp: NaiveDateTime,
    pub event_index: usize,
    pub product_id: Option<String>,
    pub product_price: Option<f64>,
    pub product_category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub product_id: String,
    pub title: String,
    pub sku: String,
    pub quantity: u32,
    pub price: f64,
    pub total: f64,
}

/// Created exactly when a session reaches the terminal purchase step and a
/// product catalog exists. Never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub order_id: i64,
    pub user_id: String,
    pub cookie_id: String,
    pub session_id: String,
    pub timestamp: NaiveDateTime,
    pub total_price: f64,
    pub currency: String,
    pub financial_status: String,
    pub fulfillment_status: String,
    pub customer_email: String,
    pub line_items: Vec<LineItem>,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
}

/// Aggregate output of one simulation run, read-only once returned by the
/// driver. The index maps give formatters O(1) joins by id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationResult {
    pub users: Vec<User>,
    pub sessions: Vec<Session>,
    pub events: Vec<FunnelEvent>,
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    #[serde(skip)]
    user_index: HashMap<String, usize>,
    #[serde(skip)]
    session_index: HashMap<String, usize>,
}

impl SimulationResult {
    /// Rebuild the id indexes after the entity lists are final.
    pub fn rebuild_indexes(&mut self) {
        self.user_index = self
            .users
            .iter()
            .enumerate()
            .map(|(position, user)| (user.user_id.clone(), position))
            .collect();
        self.session_index = self
            .sessions
            .iter()
            .enumerate()
            .map(|(position, session)| (session.session_id.clone(), position))
            .collect();
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.user_index
            .get(user_id)
            .and_then(|position| self.users.get(*position))
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.session_index
            .get(session_id)
            .and_then(|position| self.sessions.get(*position))
    }
}
