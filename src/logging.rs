//! # Structured Logging Module
//!
//! Environment-aware structured logging for deployment runs: human-readable
//! console output for interactive use, JSON output for pipeline log
//! collection. Also hosts the structured error writer that records the raw
//! provider error before a wrapped failure is surfaced.

use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::arm::ArmError;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let filter = || {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.clone()))
        };

        // Try to initialize, but don't panic if a subscriber already exists
        // (the host task may have installed its own).
        let init_result = if use_json_format() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .json()
                        .with_filter(filter()),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_ansi(true)
                        .with_filter(filter()),
                )
                .try_init()
        };

        if init_result.is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            environment = %environment,
            log_level = %log_level,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables.
fn get_environment() -> String {
    std::env::var("ARMDEPLOY_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment.
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// JSON output is opt-in for pipeline log collection.
fn use_json_format() -> bool {
    std::env::var("ARMDEPLOY_LOG_FORMAT").is_ok_and(|format| format == "json")
}

/// Log structured data for deployment operations.
pub fn log_deployment_operation(
    operation: &str,
    deployment_name: Option<&str>,
    resource_group: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        deployment_name = deployment_name,
        resource_group = resource_group,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🚀 DEPLOYMENT_OPERATION"
    );
}

/// Log structured data for resource group operations.
pub fn log_resource_group_operation(
    operation: &str,
    resource_group: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        resource_group = %resource_group,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🏗️ RESOURCE_GROUP_OPERATION"
    );
}

/// Write the raw provider error, including nested details, before the wrapped
/// failure is raised, so operators retain the original cause even though the
/// surfaced error carries a generic message.
pub fn log_deployment_errors(error: &ArmError) {
    let raw = serde_json::to_string(error).unwrap_or_else(|_| error.to_string());
    tracing::error!(
        code = %error.code,
        message = %error.message,
        raw = %raw,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ DEPLOYMENT_ERROR"
    );

    if let Some(details) = &error.details {
        for detail in details {
            log_deployment_errors(detail);
        }
    }
    if let Some(nested) = &error.error {
        log_deployment_errors(nested);
    }
}
