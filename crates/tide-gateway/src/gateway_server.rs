use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path as RoutePath, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tide_allocations::{AllocationService, AllocationServiceError};
use tide_core::current_unix_timestamp_ms;
use tide_scenarios::ScenarioRegistry;
use tokio::net::TcpListener;

mod endpoints;
mod scenario_handlers;
mod server_bootstrap;
mod status_runtime;
mod types;

use endpoints::*;
use scenario_handlers::{
    handle_scenario_allocations, handle_scenario_summary, handle_scenarios_list,
};
use status_runtime::handle_gateway_status;
use types::{AllocationsQuery, GatewayApiError};

pub use server_bootstrap::{build_gateway_router, run_gateway_server};

#[derive(Debug, Clone)]
/// Public struct `GatewayServerConfig` used across Tide components.
pub struct GatewayServerConfig {
    pub bind: String,
    pub snapshot_cache: bool,
}

/// Shared, request-independent state of the gateway.
///
/// Nothing here is mutated by a request apart from the served-request counter.
pub struct GatewayServerState {
    config: GatewayServerConfig,
    service: AllocationService,
    started_unix_ms: u64,
    requests_served: AtomicU64,
}

impl GatewayServerState {
    pub fn new(config: GatewayServerConfig, registry: Arc<ScenarioRegistry>) -> Self {
        let service = AllocationService::new(registry).with_snapshot_cache(config.snapshot_cache);
        Self::with_service(config, service)
    }

    pub fn with_service(config: GatewayServerConfig, service: AllocationService) -> Self {
        Self {
            config,
            service,
            started_unix_ms: current_unix_timestamp_ms(),
            requests_served: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &AllocationService {
        &self.service
    }

    fn record_request(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}
