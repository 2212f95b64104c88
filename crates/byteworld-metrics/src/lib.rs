//! # Byte World Metrics
//!
//! Prometheus metrics for the Byte World registry.
//!
//! [`RegistryMetrics`] owns a private Prometheus registry holding:
//!
//! | Metric | Type | Labels |
//! |---|---|---|
//! | `registry_api_requests_total` | counter | `endpoint` |
//! | `registry_reloads_total` | counter | `outcome` |
//! | `registry_asn_total` | gauge | |
//! | `registry_ipv4_prefixes_total` | gauge | |
//! | `registry_ipv6_prefixes_total` | gauge | |
//! | `registry_services_total` | gauge | `service_type` |
//! | `registry_generation` | gauge | |
//!
//! ## Example
//!
//! ```rust
//! use byteworld_metrics::{RegistryMetrics, ReloadOutcome};
//!
//! let metrics = RegistryMetrics::new()?;
//! metrics.record_request("asn");
//! metrics.record_reload(ReloadOutcome::Success);
//!
//! let text = metrics.render()?;
//! assert!(text.contains("registry_api_requests_total{endpoint=\"asn\"} 1"));
//! # Ok::<(), byteworld_metrics::MetricsError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::fmt;

use byteworld_core::{RegistryStats, ServiceCategory};
use prometheus::{Encoder, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;
use tracing::debug;

/// Errors raised while registering or rendering metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A collector could not be created or registered.
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    /// Rendered exposition text was not UTF-8.
    #[error("Metrics output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type for metrics operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Outcome label of a registry reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new index was published.
    Success,
    /// The tree failed validation; the previous index was kept.
    Rejected,
}

impl ReloadOutcome {
    /// Returns the label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content type of [`RegistryMetrics::render`] output.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Registry size, traffic and reload metrics.
#[derive(Clone)]
pub struct RegistryMetrics {
    registry: Registry,
    requests: IntCounterVec,
    reloads: IntCounterVec,
    asns: IntGauge,
    ipv4_prefixes: IntGauge,
    ipv6_prefixes: IntGauge,
    services: IntGaugeVec,
    generation: IntGauge,
}

impl RegistryMetrics {
    /// Creates the metrics and registers them with a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a collector cannot be registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("registry_api_requests_total", "Total API requests"),
            &["endpoint"],
        )?;
        let reloads = IntCounterVec::new(
            Opts::new("registry_reloads_total", "Registry reloads by outcome"),
            &["outcome"],
        )?;
        let asns = IntGauge::new("registry_asn_total", "Total ASN records")?;
        let ipv4_prefixes = IntGauge::new("registry_ipv4_prefixes_total", "Total IPv4 prefixes")?;
        let ipv6_prefixes = IntGauge::new("registry_ipv6_prefixes_total", "Total IPv6 prefixes")?;
        let services = IntGaugeVec::new(
            Opts::new("registry_services_total", "Total services by type"),
            &["service_type"],
        )?;
        let generation = IntGauge::new(
            "registry_generation",
            "Number of registry snapshots published",
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(reloads.clone()))?;
        registry.register(Box::new(asns.clone()))?;
        registry.register(Box::new(ipv4_prefixes.clone()))?;
        registry.register(Box::new(ipv6_prefixes.clone()))?;
        registry.register(Box::new(services.clone()))?;
        registry.register(Box::new(generation.clone()))?;

        Ok(Self {
            registry,
            requests,
            reloads,
            asns,
            ipv4_prefixes,
            ipv6_prefixes,
            services,
            generation,
        })
    }

    /// Counts one request to `endpoint`.
    pub fn record_request(&self, endpoint: &str) {
        self.requests.with_label_values(&[endpoint]).inc();
    }

    /// Counts one reload attempt.
    pub fn record_reload(&self, outcome: ReloadOutcome) {
        self.reloads.with_label_values(&[outcome.as_str()]).inc();
    }

    /// Sets the size gauges from a published snapshot.
    ///
    /// Every known service category is set, so a category that disappears
    /// from the registry drops to zero instead of keeping its old value.
    pub fn observe_stats(&self, stats: &RegistryStats, generation: u64) {
        self.asns.set(gauge_value(stats.asns));
        self.ipv4_prefixes.set(gauge_value(stats.ipv4_prefixes));
        self.ipv6_prefixes.set(gauge_value(stats.ipv6_prefixes));
        for category in ServiceCategory::ALL {
            let count = stats.services.get(category.as_str()).copied().unwrap_or(0);
            self.services
                .with_label_values(&[category.as_str()])
                .set(gauge_value(count));
        }
        self.generation
            .set(i64::try_from(generation).unwrap_or(i64::MAX));
        debug!(generation, asns = stats.asns, "Updated registry gauges");
    }

    /// Renders every metric in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl fmt::Debug for RegistryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryMetrics")
            .field("generation", &self.generation.get())
            .finish_non_exhaustive()
    }
}

fn gauge_value(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
