use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_admissions_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gurukul_admissions::config::AppConfig;
use gurukul_admissions::error::AppError;
use gurukul_admissions::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, args);
    telemetry::init(&config.telemetry)?;

    let policy = config.allocation.policy.clone();
    info!(
        enrollment_id_start = policy.enrollment_id_start,
        emit_ineligible_status = policy.emit_ineligible_status,
        "default allocation policy for requests without their own"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let ready = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: ready.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_admissions_routes(policy)
        .layer(Extension(state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    ready.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admissions allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: ServeArgs) {
    let ServeArgs {
        host,
        port,
        enrollment_id_start,
        emit_ineligible,
    } = args;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(start) = enrollment_id_start {
        config.allocation.policy.enrollment_id_start = start;
    }
    if emit_ineligible {
        config.allocation.policy.emit_ineligible_status = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurukul_admissions::allocation::AllocationPolicy;
    use gurukul_admissions::config::{
        AllocationConfig, AppEnvironment, ServerConfig, TelemetryConfig,
    };
    use std::path::PathBuf;

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            allocation: AllocationConfig {
                data_dir: PathBuf::from("."),
                output_dir: PathBuf::from("."),
                policy: AllocationPolicy::default(),
            },
        }
    }

    #[test]
    fn serve_flags_override_binding_and_default_policy() {
        let mut config = config();
        apply_overrides(
            &mut config,
            ServeArgs {
                host: Some("0.0.0.0".to_string()),
                port: Some(8080),
                enrollment_id_start: Some(5000),
                emit_ineligible: true,
            },
        );

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.allocation.policy.enrollment_id_start, 5000);
        assert!(config.allocation.policy.emit_ineligible_status);
    }

    #[test]
    fn absent_flags_keep_configured_values() {
        let mut config = config();
        apply_overrides(&mut config, ServeArgs::default());

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.allocation.policy, AllocationPolicy::default());
    }
}
