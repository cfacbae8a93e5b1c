use std::env;
use std::path::PathBuf;

use funnelmock_core::{CampaignPool, FunnelConfig, Product, SimulationOptions};
use funnelmock_format::FormatterRegistry;
use funnelmock_format::output::ArtifactWriter;
use funnelmock_sim::{FunnelSummary, SimulationDriver};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut out_dir: Option<PathBuf> = None;
    let mut days = 30_u32;
    let mut seed = 42_u64;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out_dir = args.next().map(PathBuf::from),
            "--days" => days = args.next().ok_or("missing --days value")?.parse()?,
            "--seed" => seed = args.next().ok_or("missing --seed value")?.parse()?,
            _ => return Err("unexpected argument".into()),
        }
    }
    let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("out"));

    let mut campaign_pool = CampaignPool::new();
    campaign_pool.insert(
        "google_ads".to_string(),
        vec![
            "brand_search".to_string(),
            "spring_sale".to_string(),
            "retargeting".to_string(),
        ],
    );
    campaign_pool.insert(
        "facebook_ads".to_string(),
        vec!["lookalike_1pct".to_string(), "spring_sale".to_string()],
    );

    let product_catalog: Vec<Product> = (1..=25)
        .map(|index| Product {
            id: format!("prod_{index:03}"),
            title: format!("Product {index:03}"),
            sku: format!("SKU-{index:03}"),
            price: 9.99 + f64::from(index) * 2.5,
            category: if index % 2 == 0 { "apparel" } else { "home" }.to_string(),
        })
        .collect();

    let options = SimulationOptions {
        days,
        base_seed: seed,
        ..SimulationOptions::default()
    };
    let driver = SimulationDriver::new(options, FunnelConfig::default())?;
    let result = driver.run(&campaign_pool, product_catalog);

    print!("{}", FunnelSummary::from_result(&result, days).render());

    let dataset = FormatterRegistry::new().format_all(&result)?;
    let written = ArtifactWriter::new(out_dir).write(&dataset)?;

    println!("run_dir={}", written.run_dir.display());
    Ok(())
}
