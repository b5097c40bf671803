//! Market Intelligence (§4.1): enriches an [`AuctionContext`] with
//! bidder/domain/archetype pattern statistics and derived scores, via
//! multi-tier fallback lookup over tables loaded at startup.
//!
//! The tables are injected as plain data rather than through a port
//! trait: per §5, they are immutable after startup with swap-in-place
//! reloads, which a `parking_lot::RwLock` around an owned snapshot gives
//! for free without needing a trait boundary. [`crate::adapter::outbound::tables`]
//! is the only code that constructs a [`Tables`] value.

use std::collections::HashMap;

use parking_lot::RwLock;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::{
    ArchetypeStats, AuctionContext, BehavioralCluster, BidderStats, DomainMatchType, DomainStats,
    EscalationSpeed, ExpectedValueAnalysis, MarketIntelligence, Platform, PricePercentiles,
    ResourcePriority, ValueTier,
};

use super::proxy_calculator::safe_max;

/// One row of the bidder-profile table (schema per §6, `…` columns
/// supplemented with `aggression_score` so cluster-match has something to
/// compare against).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BidderProfile {
    pub bidder_id: String,
    pub total_auctions: u32,
    pub avg_bid_increase: f64,
    pub avg_reaction_time_s: f64,
    pub win_rate: f64,
    pub late_bid_ratio: f64,
    pub aggression_score: f64,
    pub behavioral_cluster: BehavioralCluster,
}

/// One row of the domain-statistics table.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DomainProfile {
    pub domain: String,
    pub avg_final_price: f64,
    pub volatility: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub sample_size: u32,
}

/// One row of the platform-archetype table.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ArchetypeProfile {
    pub platform: Platform,
    pub avg_late_bid_ratio: f64,
    pub avg_bid_jump: f64,
    pub avg_duration_s: f64,
}

/// The loaded statistical tables, immutable between swaps.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub bidders: Vec<BidderProfile>,
    pub domains: Vec<DomainProfile>,
    pub archetypes: HashMap<Platform, ArchetypeProfile>,
}

/// Minimum cluster sample size for a usable bidder-cluster match (§4.1).
const MIN_CLUSTER_SAMPLES: usize = 5;
const AGGRESSION_BAND: f64 = 2.0;
const REACTION_TIME_BAND_S: f64 = 60.0;
/// Domain/value-tier pattern band: ±30% of `estimated_value`.
const VALUE_BAND_RATIO: f64 = 0.30;

/// Tier-appropriate attenuation ceiling for a pattern-matched confidence,
/// relative to an exact match (§4.1: "capped at 0.75 below exact").
const MAX_PATTERN_CONFIDENCE: f64 = 0.75;

pub struct MarketIntelligenceEngine {
    tables: RwLock<Tables>,
}

impl MarketIntelligenceEngine {
    #[must_use]
    pub fn new(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Atomically swap in a freshly loaded table set. The only writer;
    /// readers never block behind a writer for longer than the swap.
    pub fn reload(&self, tables: Tables) {
        *self.tables.write() = tables;
    }

    /// Enrich `ctx`. Pure given the loaded tables; fails open by returning
    /// `unknown`/zeroed enrichment on any lookup miss rather than erroring.
    #[must_use]
    pub fn enrich(&self, ctx: &AuctionContext) -> MarketIntelligence {
        let tables = self.tables.read();

        let bidder = lookup_bidder(&tables, ctx);
        let domain = lookup_domain(&tables, ctx);
        let archetype = lookup_archetype(&tables, ctx.platform);

        let win_probability = compute_win_probability(ctx, &bidder, &domain);
        let expected_value_analysis = compute_expected_value(ctx, &domain, win_probability);
        let resource_score = compute_resource_score(ctx, &expected_value_analysis, win_probability);
        let resource_priority = ResourcePriority::from_score(resource_score);

        MarketIntelligence {
            bidder,
            domain,
            archetype,
            win_probability,
            expected_value_analysis,
            resource_score,
            resource_priority,
        }
    }
}

fn lookup_bidder(tables: &Tables, ctx: &AuctionContext) -> BidderStats {
    if let Some(id) = &ctx.last_bidder_id {
        if let Some(profile) = tables.bidders.iter().find(|b| &b.bidder_id == id) {
            return BidderStats {
                found: true,
                behavioral_cluster: profile.behavioral_cluster,
                sample_size: 1,
                fold_probability: Some(1.0 - profile.win_rate),
                avg_win_rate: Some(profile.win_rate),
            };
        }
    }

    let cluster: Vec<&BidderProfile> = tables
        .bidders
        .iter()
        .filter(|b| {
            (b.aggression_score - ctx.bidder_analysis.aggression_score).abs() <= AGGRESSION_BAND
                && (b.avg_reaction_time_s - ctx.bidder_analysis.reaction_time_avg_s).abs()
                    <= REACTION_TIME_BAND_S
        })
        .collect();

    if cluster.len() < MIN_CLUSTER_SAMPLES {
        return BidderStats::unknown();
    }

    let avg_win_rate = cluster.iter().map(|b| b.win_rate).sum::<f64>() / cluster.len() as f64;
    let dominant_cluster = dominant_cluster(&cluster);

    BidderStats {
        found: false,
        behavioral_cluster: dominant_cluster,
        sample_size: cluster.len() as u32,
        fold_probability: Some(1.0 - avg_win_rate),
        avg_win_rate: Some(avg_win_rate),
    }
}

fn dominant_cluster(cluster: &[&BidderProfile]) -> BehavioralCluster {
    let mut counts: HashMap<BehavioralCluster, usize> = HashMap::new();
    for profile in cluster {
        *counts.entry(profile.behavioral_cluster).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map_or(BehavioralCluster::Unknown, |(cluster, _)| cluster)
}

fn lookup_domain(tables: &Tables, ctx: &AuctionContext) -> DomainStats {
    if let Some(profile) = tables.domains.iter().find(|d| d.domain == ctx.domain) {
        return domain_stats_from(profile, DomainMatchType::Exact, 1.0);
    }

    let tld = trailing_label(&ctx.domain);
    let tld_matches: Vec<&DomainProfile> = tables
        .domains
        .iter()
        .filter(|d| trailing_label(&d.domain) == tld)
        .collect();
    if !tld_matches.is_empty() {
        let aggregate = aggregate_domains(&tld_matches);
        let confidence = attenuated_confidence(aggregate.sample_size);
        return domain_stats_from_aggregate(
            aggregate,
            DomainMatchType::TldPattern,
            confidence,
        );
    }

    let estimated_value = ctx.estimated_value.to_f64().unwrap_or(0.0);
    let band = estimated_value * VALUE_BAND_RATIO;
    let tier_matches: Vec<&DomainProfile> = tables
        .domains
        .iter()
        .filter(|d| (d.avg_final_price - estimated_value).abs() <= band)
        .collect();
    if !tier_matches.is_empty() {
        let aggregate = aggregate_domains(&tier_matches);
        let confidence = attenuated_confidence(aggregate.sample_size);
        return domain_stats_from_aggregate(
            aggregate,
            DomainMatchType::ValueTierPattern,
            confidence,
        );
    }

    if tables.domains.is_empty() {
        return DomainStats {
            match_type: DomainMatchType::PlatformAvg,
            avg_final_price: 0.0,
            price_percentiles: PricePercentiles::default(),
            volatility: 0.0,
            sample_size: 0,
            confidence: 0.0,
        };
    }
    let all: Vec<&DomainProfile> = tables.domains.iter().collect();
    let aggregate = aggregate_domains(&all);
    let confidence = attenuated_confidence(aggregate.sample_size);
    domain_stats_from_aggregate(aggregate, DomainMatchType::PlatformAvg, confidence)
}

fn trailing_label(domain: &str) -> &str {
    domain.rsplit('.').next().unwrap_or(domain)
}

struct DomainAggregate {
    avg_final_price: f64,
    price_percentiles: PricePercentiles,
    volatility: f64,
    sample_size: u32,
}

fn aggregate_domains(profiles: &[&DomainProfile]) -> DomainAggregate {
    let n = profiles.len() as f64;
    let sample_size: u32 = profiles.iter().map(|d| d.sample_size).sum();
    DomainAggregate {
        avg_final_price: profiles.iter().map(|d| d.avg_final_price).sum::<f64>() / n,
        price_percentiles: PricePercentiles {
            p25: profiles.iter().map(|d| d.p25).sum::<f64>() / n,
            p50: profiles.iter().map(|d| d.p50).sum::<f64>() / n,
            p75: profiles.iter().map(|d| d.p75).sum::<f64>() / n,
            p90: profiles.iter().map(|d| d.p90).sum::<f64>() / n,
        },
        volatility: profiles.iter().map(|d| d.volatility).sum::<f64>() / n,
        sample_size,
    }
}

fn domain_stats_from(
    profile: &DomainProfile,
    match_type: DomainMatchType,
    confidence: f64,
) -> DomainStats {
    DomainStats {
        match_type,
        avg_final_price: profile.avg_final_price,
        price_percentiles: PricePercentiles {
            p25: profile.p25,
            p50: profile.p50,
            p75: profile.p75,
            p90: profile.p90,
        },
        volatility: profile.volatility,
        sample_size: profile.sample_size,
        confidence,
    }
}

fn domain_stats_from_aggregate(
    aggregate: DomainAggregate,
    match_type: DomainMatchType,
    confidence: f64,
) -> DomainStats {
    DomainStats {
        match_type,
        avg_final_price: aggregate.avg_final_price,
        price_percentiles: aggregate.price_percentiles,
        volatility: aggregate.volatility,
        sample_size: aggregate.sample_size,
        confidence,
    }
}

/// Attenuate a pattern match's confidence by `sqrt(sample_size / 50)`,
/// capped below an exact match's implicit confidence of 1.0.
fn attenuated_confidence(sample_size: u32) -> f64 {
    (f64::from(sample_size) / 50.0).sqrt().min(MAX_PATTERN_CONFIDENCE)
}

fn lookup_archetype(tables: &Tables, platform: Platform) -> ArchetypeStats {
    let Some(profile) = tables.archetypes.get(&platform) else {
        return ArchetypeStats {
            avg_late_bid_ratio: 0.0,
            avg_bid_jump: 0.0,
            avg_duration_s: 0.0,
            escalation_speed: EscalationSpeed::Moderate,
            sniper_dominated: false,
            proxy_driven: false,
        };
    };

    let escalation_speed = if profile.avg_bid_jump < 50.0 {
        EscalationSpeed::Slow
    } else if profile.avg_bid_jump > 200.0 {
        EscalationSpeed::Fast
    } else {
        EscalationSpeed::Moderate
    };

    ArchetypeStats {
        avg_late_bid_ratio: profile.avg_late_bid_ratio,
        avg_bid_jump: profile.avg_bid_jump,
        avg_duration_s: profile.avg_duration_s,
        escalation_speed,
        sniper_dominated: profile.avg_late_bid_ratio > 0.7,
        proxy_driven: profile.avg_late_bid_ratio < 0.3,
    }
}

fn compute_win_probability(ctx: &AuctionContext, bidder: &BidderStats, domain: &DomainStats) -> f64 {
    let base = match ctx.num_bidders {
        0 => 0.95,
        1 => 0.70,
        2 => 0.50,
        _ => 0.30,
    };
    let opponent_win_rate = bidder.avg_win_rate.unwrap_or(0.5);
    let fold_probability = bidder.fold_probability.unwrap_or(0.5);

    let safe_max = safe_max(ctx.estimated_value).to_f64().unwrap_or(0.0);
    let budget = ctx.budget_available.to_f64().unwrap_or(0.0);
    let budget_adequacy = 0.5 + 0.5 * if safe_max > 0.0 { (budget / safe_max).min(1.0) } else { 1.0 };

    let probability = base * (1.0 - opponent_win_rate * 0.5)
        + (fold_probability - 0.5) * 0.2;
    let probability = probability * budget_adequacy * (1.0 - domain.volatility * 0.5);

    probability.clamp(0.0, 1.0)
}

fn compute_expected_value(
    ctx: &AuctionContext,
    domain: &DomainStats,
    win_probability: f64,
) -> ExpectedValueAnalysis {
    let estimated_value = ctx.estimated_value.to_f64().unwrap_or(0.0);
    let expected_final_price = if domain.sample_size > 0 {
        domain.price_percentiles.p50
    } else {
        estimated_value
    };
    let expected_profit = estimated_value - expected_final_price;
    let ev = win_probability * expected_profit;
    let risk_adjusted_ev = ev * (1.0 - domain.volatility * 0.5);
    let roi = if expected_final_price != 0.0 {
        risk_adjusted_ev / expected_final_price
    } else {
        0.0
    };

    let recommendation = if risk_adjusted_ev > 0.0 && win_probability >= 0.5 {
        "favorable: positive risk-adjusted expected value with a reasonable win probability"
    } else if risk_adjusted_ev > 0.0 {
        "marginal: positive expected value but a low win probability"
    } else {
        "unfavorable: non-positive risk-adjusted expected value"
    }
    .to_string();

    ExpectedValueAnalysis {
        expected_final_price,
        expected_profit,
        risk_adjusted_ev,
        roi,
        recommendation,
    }
}

fn compute_resource_score(
    ctx: &AuctionContext,
    ev: &ExpectedValueAnalysis,
    win_probability: f64,
) -> f64 {
    let estimated_value = ctx.estimated_value.to_f64().unwrap_or(0.0);
    let expected_margin = if estimated_value != 0.0 {
        ev.expected_profit / estimated_value
    } else {
        0.0
    };
    win_probability * expected_margin * (1.0 + ev.roi)
}

#[must_use]
pub fn value_tier(ctx: &AuctionContext) -> ValueTier {
    ValueTier::classify(ctx.estimated_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BidderAnalysis;
    use rust_decimal_macros::dec;

    fn ctx() -> AuctionContext {
        AuctionContext {
            domain: "niceword.com".to_string(),
            platform: Platform::GoDaddy,
            estimated_value: dec!(1000),
            current_bid: dec!(100),
            your_current_proxy: dec!(0),
            budget_available: dec!(5000),
            num_bidders: 2,
            hours_remaining: 5.0,
            bidder_analysis: BidderAnalysis {
                bot_detected: false,
                corporate_buyer: false,
                aggression_score: 5.0,
                reaction_time_avg_s: 10.0,
            },
            thread_id: "t1".to_string(),
            last_bidder_id: None,
        }
    }

    #[test]
    fn empty_tables_fail_open_to_unknown() {
        let engine = MarketIntelligenceEngine::new(Tables::default());
        let intel = engine.enrich(&ctx());
        assert!(!intel.bidder.found);
        assert_eq!(intel.bidder.behavioral_cluster, BehavioralCluster::Unknown);
        assert_eq!(intel.domain.match_type, DomainMatchType::PlatformAvg);
        assert!(intel.win_probability >= 0.0 && intel.win_probability <= 1.0);
    }

    #[test]
    fn exact_bidder_match_is_found() {
        let mut tables = Tables::default();
        tables.bidders.push(BidderProfile {
            bidder_id: "bidder-42".to_string(),
            total_auctions: 20,
            avg_bid_increase: 15.0,
            avg_reaction_time_s: 8.0,
            win_rate: 0.6,
            late_bid_ratio: 0.4,
            aggression_score: 4.0,
            behavioral_cluster: BehavioralCluster::Aggressive,
        });
        let mut c = ctx();
        c.last_bidder_id = Some("bidder-42".to_string());
        let engine = MarketIntelligenceEngine::new(tables);
        let intel = engine.enrich(&c);
        assert!(intel.bidder.found);
        assert_eq!(intel.bidder.behavioral_cluster, BehavioralCluster::Aggressive);
    }

    #[test]
    fn cluster_match_needs_minimum_samples() {
        let mut tables = Tables::default();
        for i in 0..4 {
            tables.bidders.push(BidderProfile {
                bidder_id: format!("b{i}"),
                total_auctions: 5,
                avg_bid_increase: 10.0,
                avg_reaction_time_s: 10.0,
                win_rate: 0.5,
                late_bid_ratio: 0.3,
                aggression_score: 5.0,
                behavioral_cluster: BehavioralCluster::Casual,
            });
        }
        let engine = MarketIntelligenceEngine::new(tables);
        let intel = engine.enrich(&ctx());
        // Only 4 profiles in band, below the 5-sample floor.
        assert!(!intel.bidder.found);
        assert_eq!(intel.bidder.behavioral_cluster, BehavioralCluster::Unknown);
    }

    #[test]
    fn tld_pattern_beats_platform_average() {
        let mut tables = Tables::default();
        tables.domains.push(DomainProfile {
            domain: "other.com".to_string(),
            avg_final_price: 900.0,
            volatility: 0.2,
            p25: 700.0,
            p50: 850.0,
            p75: 950.0,
            p90: 1100.0,
            sample_size: 20,
        });
        let engine = MarketIntelligenceEngine::new(tables);
        let intel = engine.enrich(&ctx());
        assert_eq!(intel.domain.match_type, DomainMatchType::TldPattern);
    }

    #[test]
    fn resource_priority_derives_from_score() {
        let engine = MarketIntelligenceEngine::new(Tables::default());
        let intel = engine.enrich(&ctx());
        assert_eq!(
            intel.resource_priority,
            ResourcePriority::from_score(intel.resource_score)
        );
    }

    #[test]
    fn reload_swaps_tables_for_subsequent_calls() {
        let engine = MarketIntelligenceEngine::new(Tables::default());
        assert_eq!(
            engine.enrich(&ctx()).domain.match_type,
            DomainMatchType::PlatformAvg
        );

        let mut tables = Tables::default();
        tables.domains.push(DomainProfile {
            domain: "niceword.com".to_string(),
            avg_final_price: 1000.0,
            volatility: 0.1,
            p25: 800.0,
            p50: 950.0,
            p75: 1100.0,
            p90: 1300.0,
            sample_size: 40,
        });
        engine.reload(tables);
        assert_eq!(
            engine.enrich(&ctx()).domain.match_type,
            DomainMatchType::Exact
        );
    }
}
