//! Pure constructors for User, Session, FunnelEvent and Order records with
//! internally consistent identifiers. All identifiers are derived from the
//! caller's rng stream, never from ambient entropy.

use chrono::NaiveDateTime;
use fake::Fake;
use fake::faker::internet::en::FreeEmailProvider;
use rand::Rng;

use funnelmock_core::{FunnelEvent, LineItem, Order, Product, Session, User};

use crate::sampling::pick_weighted;
use crate::traffic::ResolvedTraffic;

const DEVICE_WEIGHTS: [(&str, f64); 3] =
    [("mobile", 0.55), ("desktop", 0.35), ("tablet", 0.10)];

struct GeoRegion {
    country: &'static str,
    cities: &'static [&'static str],
    weight: f64,
}

const GEO_WEIGHTS: [GeoRegion; 8] = [
    GeoRegion {
        country: "US",
        cities: &["New York", "Los Angeles", "Chicago", "Houston", "Phoenix"],
        weight: 0.50,
    },
    GeoRegion {
        country: "CA",
        cities: &["Toronto", "Vancouver", "Montreal"],
        weight: 0.12,
    },
    GeoRegion {
        country: "GB",
        cities: &["London", "Manchester", "Birmingham"],
        weight: 0.10,
    },
    GeoRegion {
        country: "DE",
        cities: &["Berlin", "Munich", "Hamburg"],
        weight: 0.08,
    },
    GeoRegion {
        country: "AU",
        cities: &["Sydney", "Melbourne", "Brisbane"],
        weight: 0.07,
    },
    GeoRegion {
        country: "FR",
        cities: &["Paris", "Lyon", "Marseille"],
        weight: 0.06,
    },
    GeoRegion {
        country: "JP",
        cities: &["Tokyo", "Osaka", "Yokohama"],
        weight: 0.04,
    },
    GeoRegion {
        country: "BR",
        cities: &["Sao Paulo", "Rio de Janeiro"],
        weight: 0.03,
    },
];

const LANDING_PAGES_PAID: [&str; 5] = [
    "/landing/sale",
    "/landing/new-arrivals",
    "/landing/free-shipping",
    "/products/featured",
    "/collections/best-sellers",
];

const LANDING_PAGES_ORGANIC: [&str; 5] =
    ["/", "/products", "/collections/all", "/about", "/blog/post"];

fn hex_id(prefix: &str, bytes: usize, rng: &mut impl Rng) -> String {
    let mut buffer = vec![0_u8; bytes];
    rng.fill(buffer.as_mut_slice());
    format!("{prefix}_{}", hex::encode(buffer))
}

/// Spawn an anonymous user with a cookie id. No email until they purchase.
pub fn create_user(rng: &mut impl Rng) -> User {
    let device = pick_weighted(&DEVICE_WEIGHTS, |entry| entry.1, rng)
        .map(|entry| entry.0)
        .unwrap_or("mobile");
    let geo = pick_weighted(&GEO_WEIGHTS, |region| region.weight, rng);
    let (country, city) = match geo {
        Some(region) => {
            let city = region.cities[rng.random_range(0..region.cities.len())];
            (region.country, city)
        }
        None => ("US", "New York"),
    };

    User {
        user_id: hex_id("u", 6, rng),
        cookie_id: format!(
            "GA1.1.{}.{}",
            rng.random_range(1_000_000..=9_999_999),
            rng.random_range(1_600_000_000_u64..=1_700_000_000)
        ),
        email: String::new(),
        device_category: device.to_string(),
        geo_country: country.to_string(),
        geo_city: city.to_string(),
        is_customer: false,
        order_count: 0,
    }
}

/// Create a session record with utm attribution from the resolved traffic
/// source. Device and geo are copied from the owning user.
pub fn create_session(
    user: &User,
    session_number: u32,
    timestamp: NaiveDateTime,
    traffic: &ResolvedTraffic,
    rng: &mut impl Rng,
) -> Session {
    let pages: &[&str] = if traffic.is_paid {
        &LANDING_PAGES_PAID
    } else {
        &LANDING_PAGES_ORGANIC
    };

    Session {
        session_id: hex_id("s", 8, rng),
        user_id: user.user_id.clone(),
        cookie_id: user.cookie_id.clone(),
        session_number,
        timestamp,
        utm_source: traffic.source.clone(),
        utm_medium: traffic.medium.clone(),
        utm_campaign: traffic.campaign.clone(),
        landing_page: pages[rng.random_range(0..pages.len())].to_string(),
        device_category: user.device_category.clone(),
        geo_country: user.geo_country.clone(),
        geo_city: user.geo_city.clone(),
        is_paid: traffic.is_paid,
        converted: false,
        max_funnel_depth: 0,
    }
}

/// Create a single funnel event. Product reference fields are stamped only
/// past the initial step and only when a browsing context exists.
pub fn create_event(
    session: &Session,
    user: &User,
    event_name: &str,
    timestamp: NaiveDateTime,
    step_index: usize,
    product: Option<&Product>,
    rng: &mut impl Rng,
) -> FunnelEvent {
    let product = product.filter(|_| step_index >= 1);
    FunnelEvent {
        event_id: hex_id("e", 8, rng),
        session_id: session.session_id.clone(),
        user_id: user.user_id.clone(),
        cookie_id: user.cookie_id.clone(),
        event_name: event_name.to_string(),
        timestamp,
        event_index: step_index,
        product_id: product.map(|product| product.id.clone()),
        product_price: product.map(|product| product.price),
        product_category: product.map(|product| product.category.clone()),
    }
}

/// Create an order from a purchase event: 1-4 weighted line items, currency
/// rounded to cents. Backfills the user's email on first purchase, bumps
/// their order count, flags them a customer and the session converted.
pub fn create_order(
    session: &mut Session,
    user: &mut User,
    purchase_time: NaiveDateTime,
    products: &[Product],
    rng: &mut impl Rng,
) -> Order {
    let item_count = rng.random_range(1..=4);
    let mut line_items = Vec::with_capacity(item_count);
    let mut subtotal = 0.0;
    for _ in 0..item_count {
        let Some(product) = pick_weighted(products, |_| 1.0, rng) else {
            break;
        };
        let quantity = rng.random_range(1..=3_u32);
        let total = round_cents(product.price * f64::from(quantity));
        subtotal += total;
        line_items.push(LineItem {
            product_id: product.id.clone(),
            title: product.title.clone(),
            sku: product.sku.clone(),
            quantity,
            price: product.price,
            total,
        });
    }

    if user.email.is_empty() {
        let domain: String = FreeEmailProvider().fake_with_rng(rng);
        let stem: String = user.user_id.chars().take(12).collect();
        user.email = format!("{stem}@{domain}");
    }
    user.is_customer = true;
    user.order_count += 1;
    session.converted = true;

    Order {
        order_id: rng.random_range(100_000..=9_999_999),
        user_id: user.user_id.clone(),
        cookie_id: user.cookie_id.clone(),
        session_id: session.session_id.clone(),
        timestamp: purchase_time,
        total_price: round_cents(subtotal),
        currency: "USD".to_string(),
        financial_status: "paid".to_string(),
        fulfillment_status: ["fulfilled", "unfulfilled", "partial"]
            [rng.random_range(0..3)]
        .to_string(),
        customer_email: user.email.clone(),
        line_items,
        utm_source: session.utm_source.clone(),
        utm_medium: session.utm_medium.clone(),
        utm_campaign: session.utm_campaign.clone(),
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
