//! Analytics-event projections: three flat event schemas built from
//! `FunnelEvent` joined with its session and user context.

use std::collections::HashMap;

use serde::Serialize;

use funnelmock_core::{Order, SimulationResult};

use crate::remap::pick_stable;
use crate::{FormatError, PlatformFormatter, PlatformTables, to_rows};

const BROWSERS: [&str; 4] = ["Chrome", "Safari", "Firefox", "Edge"];

fn orders_by_session(result: &SimulationResult) -> HashMap<&str, &Order> {
    result
        .orders
        .iter()
        .map(|order| (order.session_id.as_str(), order))
        .collect()
}

// GA4

#[derive(Debug, Serialize)]
struct Ga4EventRow {
    event_name: String,
    event_date: String,
    event_timestamp: i64,
    user_pseudo_id: String,
    user_id: String,
    geo_country: String,
    geo_city: String,
    traffic_source_source: String,
    traffic_source_medium: String,
    traffic_source_campaign: String,
    device_category: String,
    ga_session_id: String,
    ecommerce_transaction_id: String,
    ecommerce_value: f64,
    ecommerce_currency: String,
}

pub struct Ga4Formatter;

impl PlatformFormatter for Ga4Formatter {
    fn platform(&self) -> &'static str {
        "google_analytics"
    }

    fn format(&self, result: &SimulationResult) -> Result<PlatformTables, FormatError> {
        let orders = orders_by_session(result);

        let events: Vec<Ga4EventRow> = result
            .events
            .iter()
            .map(|event| {
                let session = result.session(&event.session_id);
                let order = if event.event_name == "purchase" {
                    orders.get(event.session_id.as_str()).copied()
                } else {
                    None
                };

                Ga4EventRow {
                    event_name: event.event_name.clone(),
                    event_date: event.timestamp.format("%Y%m%d").to_string(),
                    event_timestamp: event.timestamp.and_utc().timestamp_micros(),
                    user_pseudo_id: format!("ga_{}", event.cookie_id),
                    user_id: event.user_id.clone(),
                    geo_country: session
                        .map(|s| s.geo_country.clone())
                        .unwrap_or_else(|| "US".to_string()),
                    geo_city: session
                        .map(|s| s.geo_city.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    traffic_source_source: session
                        .map(|s| s.utm_source.clone())
                        .unwrap_or_else(|| "(direct)".to_string()),
                    traffic_source_medium: session
                        .map(|s| s.utm_medium.clone())
                        .unwrap_or_else(|| "(none)".to_string()),
                    traffic_source_campaign: session
                        .map(|s| s.utm_campaign.clone())
                        .unwrap_or_else(|| "(not set)".to_string()),
                    device_category: session
                        .map(|s| s.device_category.clone())
                        .unwrap_or_else(|| "mobile".to_string()),
                    ga_session_id: trailing_chars(&event.session_id, 8),
                    ecommerce_transaction_id: order
                        .map(|o| o.order_id.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    ecommerce_value: order.map(|o| o.total_price).unwrap_or(0.0),
                    ecommerce_currency: "USD".to_string(),
                }
            })
            .collect();

        let mut tables = PlatformTables::new();
        tables.insert("events".to_string(), to_rows(&events)?);
        Ok(tables)
    }
}

fn trailing_chars(value: &str, count: usize) -> String {
    let start = value.len().saturating_sub(count);
    value.get(start..).unwrap_or(value).to_string()
}

// Amplitude

#[derive(Debug, Serialize)]
struct AmplitudeEventRow {
    event_id: String,
    event_type: String,
    user_id: String,
    event_time: String,
    device_type: String,
    country: String,
}

#[derive(Debug, Serialize)]
struct AmplitudeUserRow {
    user_id: String,
    device_type: String,
    country: String,
}

pub struct AmplitudeFormatter;

impl PlatformFormatter for AmplitudeFormatter {
    fn platform(&self) -> &'static str {
        "amplitude"
    }

    fn format(&self, result: &SimulationResult) -> Result<PlatformTables, FormatError> {
        let events: Vec<AmplitudeEventRow> = result
            .events
            .iter()
            .map(|event| {
                let user = result.user(&event.user_id);
                AmplitudeEventRow {
                    event_id: event.event_id.clone(),
                    event_type: event.event_name.clone(),
                    user_id: event.user_id.clone(),
                    event_time: event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    device_type: user
                        .map(|u| u.device_category.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    country: user
                        .map(|u| u.geo_country.clone())
                        .unwrap_or_else(|| "N/A".to_string()),
                }
            })
            .collect();

        let users: Vec<AmplitudeUserRow> = result
            .users
            .iter()
            .map(|user| AmplitudeUserRow {
                user_id: user.user_id.clone(),
                device_type: user.device_category.clone(),
                country: user.geo_country.clone(),
            })
            .collect();

        let mut tables = PlatformTables::new();
        tables.insert("events".to_string(), to_rows(&events)?);
        tables.insert("users".to_string(), to_rows(&users)?);
        Ok(tables)
    }
}

// Mixpanel

#[derive(Debug, Serialize)]
struct MixpanelEventRow {
    event: String,
    prop_distinct_id: String,
    prop_time: i64,
    prop_browser: String,
    prop_city: String,
    prop_country_code: String,
    prop_device_type: String,
    prop_utm_source: String,
    prop_utm_medium: String,
    prop_utm_campaign: String,
}

#[derive(Debug, Serialize)]
struct MixpanelPersonRow {
    distinct_id: String,
    city: String,
    email: String,
}

pub struct MixpanelFormatter;

impl PlatformFormatter for MixpanelFormatter {
    fn platform(&self) -> &'static str {
        "mixpanel"
    }

    fn format(&self, result: &SimulationResult) -> Result<PlatformTables, FormatError> {
        let events: Vec<MixpanelEventRow> = result
            .events
            .iter()
            .map(|event| {
                let session = result.session(&event.session_id);
                let user = result.user(&event.user_id);
                MixpanelEventRow {
                    event: event.event_name.clone(),
                    prop_distinct_id: event.user_id.clone(),
                    prop_time: event.timestamp.and_utc().timestamp(),
                    prop_browser: pick_stable(&event.event_id, &BROWSERS).to_string(),
                    prop_city: user.map(|u| u.geo_city.clone()).unwrap_or_default(),
                    prop_country_code: user.map(|u| u.geo_country.clone()).unwrap_or_default(),
                    prop_device_type: user
                        .map(|u| u.device_category.clone())
                        .unwrap_or_default(),
                    prop_utm_source: session
                        .map(|s| s.utm_source.clone())
                        .unwrap_or_else(|| "(direct)".to_string()),
                    prop_utm_medium: session
                        .map(|s| s.utm_medium.clone())
                        .unwrap_or_else(|| "(none)".to_string()),
                    prop_utm_campaign: session
                        .map(|s| s.utm_campaign.clone())
                        .unwrap_or_else(|| "(not set)".to_string()),
                }
            })
            .collect();

        // Only identified (purchasing) users become people profiles.
        let people: Vec<MixpanelPersonRow> = result
            .users
            .iter()
            .filter(|user| !user.email.is_empty())
            .map(|user| MixpanelPersonRow {
                distinct_id: user.user_id.clone(),
                city: user.geo_city.clone(),
                email: user.email.clone(),
            })
            .collect();

        let mut tables = PlatformTables::new();
        tables.insert("events".to_string(), to_rows(&events)?);
        tables.insert("people".to_string(), to_rows(&people)?);
        Ok(tables)
    }
}
