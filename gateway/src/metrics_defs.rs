//! Metrics definitions for the gateway.

use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUESTS: MetricDef = MetricDef {
    name: "requests",
    metric_type: MetricType::Counter,
    description: "Number of subscription requests served. Tagged with status.",
};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "request.duration",
    metric_type: MetricType::Histogram,
    description: "Request duration in seconds. Tagged with status.",
};

pub const CONFIGS_SELECTED: MetricDef = MetricDef {
    name: "configs.selected",
    metric_type: MetricType::Histogram,
    description: "Number of configs included in a successful response",
};

pub const CONFIGS_SKIPPED: MetricDef = MetricDef {
    name: "configs.skipped",
    metric_type: MetricType::Counter,
    description: "Selected configs that had no value by the time they were fetched",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUESTS, REQUEST_DURATION, CONFIGS_SELECTED, CONFIGS_SKIPPED];
