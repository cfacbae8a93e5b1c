//! E-commerce projections: orders + products for three platform variants
//! that differ only in field names, id ranges and status vocabulary.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use funnelmock_core::{Order, SimulationResult};

use crate::remap::remap_to_range;
use crate::{FormatError, PlatformFormatter, PlatformTables, to_rows};

/// Products carry no simulation timestamp, so catalog `created_at` values
/// are derived from the product id against a fixed base date.
const CATALOG_BASE_DATE: (i32, u32, u32) = (2024, 1, 1);

fn catalog_created_at(product_id: &str) -> NaiveDateTime {
    let (year, month, day) = CATALOG_BASE_DATE;
    let base = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap_or_default();
    base + Duration::days(remap_to_range(product_id, 0, 364))
}

// Shopify

#[derive(Debug, Serialize)]
struct ShopifyProductRow {
    id: i64,
    title: String,
    price: f64,
    created_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
struct ShopifyLineItemRow {
    id: i64,
    product_id: i64,
}

#[derive(Debug, Serialize)]
struct ShopifyOrderRow {
    id: i64,
    name: String,
    email: String,
    total_price: f64,
    currency: String,
    financial_status: String,
    status: String,
    customer_id: i64,
    customer_email: String,
    created_at: NaiveDateTime,
    line_items: Vec<ShopifyLineItemRow>,
}

pub struct ShopifyFormatter;

impl PlatformFormatter for ShopifyFormatter {
    fn platform(&self) -> &'static str {
        "shopify"
    }

    fn format(&self, result: &SimulationResult) -> Result<PlatformTables, FormatError> {
        let orders: Vec<ShopifyOrderRow> = result
            .orders
            .iter()
            .map(|order| ShopifyOrderRow {
                id: order.order_id,
                name: format!("#{}", order.order_id % 100_000),
                email: order.customer_email.clone(),
                total_price: order.total_price,
                currency: order.currency.clone(),
                financial_status: order.financial_status.clone(),
                status: order.fulfillment_status.clone(),
                customer_id: remap_to_range(&order.user_id, 0, 999),
                customer_email: order.customer_email.clone(),
                created_at: order.timestamp,
                line_items: shopify_line_items(order),
            })
            .collect();

        let products: Vec<ShopifyProductRow> = result
            .products
            .iter()
            .map(|product| ShopifyProductRow {
                id: remap_to_range(&product.id, 100_000, 999_999),
                title: product.title.clone(),
                price: product.price,
                created_at: catalog_created_at(&product.id),
            })
            .collect();

        let mut tables = PlatformTables::new();
        tables.insert("products".to_string(), to_rows(&products)?);
        tables.insert("orders".to_string(), to_rows(&orders)?);
        Ok(tables)
    }
}

fn shopify_line_items(order: &Order) -> Vec<ShopifyLineItemRow> {
    order
        .line_items
        .iter()
        .enumerate()
        .map(|(index, item)| ShopifyLineItemRow {
            // Line-item ids have no simulation counterpart; derive them
            // from the order id and position so they stay stable.
            id: remap_to_range(&format!("{}:{index}", order.order_id), 1_000, 9_999),
            product_id: remap_to_range(&item.product_id, 100_000, 999_999),
        })
        .collect()
}

// WooCommerce

#[derive(Debug, Serialize)]
struct WooProductRow {
    id: i64,
    name: String,
    price: f64,
    created_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
struct WooLineItemRow {
    product_id: i64,
    name: String,
    quantity: u32,
    price: f64,
}

#[derive(Debug, Serialize)]
struct WooOrderRow {
    id: i64,
    number: String,
    status: String,
    total_price: f64,
    currency: String,
    customer_id: i64,
    billing_email: String,
    line_items: Vec<WooLineItemRow>,
    created_at: NaiveDateTime,
}

pub struct WooCommerceFormatter;

impl PlatformFormatter for WooCommerceFormatter {
    fn platform(&self) -> &'static str {
        "woocommerce"
    }

    fn format(&self, result: &SimulationResult) -> Result<PlatformTables, FormatError> {
        let orders: Vec<WooOrderRow> = result
            .orders
            .iter()
            .map(|order| WooOrderRow {
                id: order.order_id % 100_000,
                number: order.order_id.to_string(),
                status: if order.financial_status == "paid" {
                    "completed"
                } else {
                    "processing"
                }
                .to_string(),
                total_price: order.total_price,
                currency: order.currency.clone(),
                customer_id: remap_to_range(&order.user_id, 0, 999),
                billing_email: order.customer_email.clone(),
                line_items: order
                    .line_items
                    .iter()
                    .map(|item| WooLineItemRow {
                        product_id: remap_to_range(&item.product_id, 1_000, 90_999),
                        name: item.title.clone(),
                        quantity: item.quantity,
                        price: item.price,
                    })
                    .collect(),
                created_at: order.timestamp,
            })
            .collect();

        let products: Vec<WooProductRow> = result
            .products
            .iter()
            .map(|product| WooProductRow {
                id: remap_to_range(&product.id, 1_000, 90_999),
                name: product.title.clone(),
                price: product.price,
                created_at: catalog_created_at(&product.id),
            })
            .collect();

        let mut tables = PlatformTables::new();
        tables.insert("products".to_string(), to_rows(&products)?);
        tables.insert("orders".to_string(), to_rows(&orders)?);
        Ok(tables)
    }
}

// BigCommerce

#[derive(Debug, Serialize)]
struct BigCommerceProductRow {
    id: i64,
    name: String,
    price: f64,
}

#[derive(Debug, Serialize)]
struct BigCommerceOrderRow {
    id: i64,
    status_id: i64,
    status: String,
    total_price: f64,
    currency: String,
    customer_id: i64,
    created_at: NaiveDateTime,
}

pub struct BigCommerceFormatter;

impl PlatformFormatter for BigCommerceFormatter {
    fn platform(&self) -> &'static str {
        "bigcommerce"
    }

    fn format(&self, result: &SimulationResult) -> Result<PlatformTables, FormatError> {
        let orders: Vec<BigCommerceOrderRow> = result
            .orders
            .iter()
            .map(|order| {
                let (status_id, status) = if order.financial_status == "paid" {
                    (11, "Completed")
                } else {
                    (2, "Shipped")
                };
                BigCommerceOrderRow {
                    id: order.order_id % 200_000 + 90_000,
                    status_id,
                    status: status.to_string(),
                    total_price: order.total_price,
                    currency: order.currency.clone(),
                    customer_id: remap_to_range(&order.user_id, 500, 1_999),
                    created_at: order.timestamp,
                }
            })
            .collect();

        let products: Vec<BigCommerceProductRow> = result
            .products
            .iter()
            .map(|product| BigCommerceProductRow {
                id: remap_to_range(&product.id, 20_000, 109_999),
                name: product.title.clone(),
                price: product.price,
            })
            .collect();

        let mut tables = PlatformTables::new();
        tables.insert("products".to_string(), to_rows(&products)?);
        tables.insert("orders".to_string(), to_rows(&orders)?);
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnelmock_core::{LineItem, Product};

    fn sample_order() -> Order {
        Order {
            order_id: 1_234_567,
            user_id: "u_aabbccddeeff".to_string(),
            cookie_id: "GA1.1.1234567.1600000000".to_string(),
            session_id: "s_0011223344556677".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2025, 5, 20)
                .and_then(|date| date.and_hms_opt(18, 45, 0))
                .expect("valid timestamp"),
            total_price: 59.97,
            currency: "USD".to_string(),
            financial_status: "paid".to_string(),
            fulfillment_status: "fulfilled".to_string(),
            customer_email: "u_aabbccddee@gmail.com".to_string(),
            line_items: vec![LineItem {
                product_id: "prod_001".to_string(),
                title: "Product 001".to_string(),
                sku: "SKU-001".to_string(),
                quantity: 3,
                price: 19.99,
                total: 59.97,
            }],
            utm_source: "google".to_string(),
            utm_medium: "cpc".to_string(),
            utm_campaign: "brand_search".to_string(),
        }
    }

    fn sample_result() -> SimulationResult {
        let mut result = SimulationResult::default();
        result.orders.push(sample_order());
        result.products.push(Product {
            id: "prod_001".to_string(),
            title: "Product 001".to_string(),
            sku: "SKU-001".to_string(),
            price: 19.99,
            category: "apparel".to_string(),
        });
        result.rebuild_indexes();
        result
    }

    #[test]
    fn shopify_preserves_monetary_fields_losslessly() {
        let tables = ShopifyFormatter.format(&sample_result()).expect("format");
        let orders = &tables["orders"];
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0]["total_price"], 59.97);
        assert_eq!(orders[0]["name"], "#34567");
        assert_eq!(orders[0]["line_items"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn woocommerce_maps_paid_to_completed() {
        let tables = WooCommerceFormatter
            .format(&sample_result())
            .expect("format");
        assert_eq!(tables["orders"][0]["status"], "completed");
        assert_eq!(tables["orders"][0]["number"], "1234567");
    }

    #[test]
    fn bigcommerce_status_pair_is_consistent() {
        let tables = BigCommerceFormatter
            .format(&sample_result())
            .expect("format");
        assert_eq!(tables["orders"][0]["status_id"], 11);
        assert_eq!(tables["orders"][0]["status"], "Completed");
    }

    #[test]
    fn product_remaps_are_deterministic_and_in_range() {
        let result = sample_result();
        let first = ShopifyFormatter.format(&result).expect("format");
        let second = ShopifyFormatter.format(&result).expect("format");
        assert_eq!(first, second);

        let id = first["products"][0]["id"].as_i64().expect("numeric id");
        assert!((100_000..=999_999).contains(&id));
    }
}
