//! Traffic source resolution: builds a weighted catalog of acquisition
//! channels from the upstream campaign pool and samples one per session.

use rand::Rng;

use funnelmock_core::CampaignPool;

use crate::sampling::pick_weighted;

/// Share of total traffic attributed to paid channels when any ad platform
/// supplies campaigns.
pub const PAID_TRAFFIC_SHARE: f64 = 0.58;

/// Campaign value attached to sessions without a paid campaign.
pub const CAMPAIGN_NOT_SET: &str = "(not set)";

/// Organic channels and their relative weights (sum to 1.0 before scaling).
const ORGANIC_CHANNELS: [(&str, &str, f64); 4] = [
    ("google", "organic", 0.40),
    ("(direct)", "(none)", 0.30),
    ("email", "email", 0.15),
    ("referral", "referral", 0.15),
];

/// utm source/medium for each known ad platform.
fn platform_channel(platform: &str) -> Option<(&'static str, &'static str)> {
    match platform {
        "google_ads" => Some(("google", "cpc")),
        "facebook_ads" => Some(("facebook", "cpc")),
        "instagram_ads" => Some(("instagram", "cpc")),
        "bing_ads" => Some(("bing", "cpc")),
        "linkedin_ads" => Some(("linkedin", "cpc")),
        "tiktok_ads" => Some(("tiktok", "cpc")),
        "amazon_ads" => Some(("amazon", "cpc")),
        _ => None,
    }
}

/// One weighted acquisition channel descriptor.
#[derive(Debug, Clone)]
pub struct TrafficSource {
    pub source: String,
    pub medium: String,
    pub weight: f64,
    pub is_paid: bool,
    pub platform: Option<String>,
    pub campaigns: Vec<String>,
}

/// Attribution resolved for one session.
#[derive(Debug, Clone)]
pub struct ResolvedTraffic {
    pub source: String,
    pub medium: String,
    pub campaign: String,
    pub is_paid: bool,
}

/// Build the weighted traffic source catalog.
///
/// Each paid platform gets weight proportional to its share of the total
/// campaign count, scaled to [`PAID_TRAFFIC_SHARE`]; whatever weight is not
/// claimed by paid channels is distributed across the organic channels by
/// their relative weights, so all weights sum to 1.0. An empty pool (or a
/// pool of only unknown platforms) degrades to organic-only attribution.
pub fn build_traffic_sources(campaign_pool: &CampaignPool) -> Vec<TrafficSource> {
    let mut sources = Vec::new();
    let total_campaigns: usize = campaign_pool.values().map(Vec::len).sum();

    for (platform, campaigns) in campaign_pool {
        if campaigns.is_empty() {
            continue;
        }
        let Some((source, medium)) = platform_channel(platform) else {
            continue;
        };
        let weight =
            (campaigns.len() as f64 / total_campaigns.max(1) as f64) * PAID_TRAFFIC_SHARE;
        sources.push(TrafficSource {
            source: source.to_string(),
            medium: medium.to_string(),
            weight,
            is_paid: true,
            platform: Some(platform.clone()),
            campaigns: campaigns.clone(),
        });
    }

    let organic_total = 1.0 - sources.iter().map(|source| source.weight).sum::<f64>();
    for (source, medium, weight) in ORGANIC_CHANNELS {
        sources.push(TrafficSource {
            source: source.to_string(),
            medium: medium.to_string(),
            weight: weight * organic_total,
            is_paid: false,
            platform: None,
            campaigns: Vec::new(),
        });
    }

    sources
}

/// Sample one traffic source and resolve its campaign name. Each call is an
/// independent weighted draw; paid sources attach a uniformly drawn campaign
/// from their pool, organic sources get [`CAMPAIGN_NOT_SET`].
pub fn resolve_traffic(sources: &[TrafficSource], rng: &mut impl Rng) -> ResolvedTraffic {
    let Some(selected) = pick_weighted(sources, |source| source.weight, rng) else {
        // Only reachable with an empty source slice, which
        // build_traffic_sources never produces.
        return ResolvedTraffic {
            source: "(direct)".to_string(),
            medium: "(none)".to_string(),
            campaign: CAMPAIGN_NOT_SET.to_string(),
            is_paid: false,
        };
    };

    let campaign = if selected.is_paid && !selected.campaigns.is_empty() {
        let index = rng.random_range(0..selected.campaigns.len());
        selected.campaigns[index].clone()
    } else {
        CAMPAIGN_NOT_SET.to_string()
    };

    ResolvedTraffic {
        source: selected.source.clone(),
        medium: selected.medium.clone(),
        campaign,
        is_paid: selected.is_paid,
    }
}
