use super::*;
use crate::checks::HealthCheckSpec;
use pinokio_core::HealthStatus;
use pinokio_supervisor::{StartOpts, Supervisor};
use std::time::Duration;

#[tokio::test]
async fn http_check_transitions_unhealthy_then_recovers() {
    let sup = Supervisor::new(21000, 21010);
    let process_id = sup
        .start(AppId::new("app-health"), vec!["sleep".to_string(), "5".to_string()], StartOpts { workdir: std::env::temp_dir(), ..Default::default() })
        .await
        .expect("start");

    let monitor = HealthMonitor::new(sup.clone());
    let app_id = AppId::new("app-health");
    let config = MonitorConfig {
        process_id: process_id.clone(),
        checks: vec![ScheduledCheck {
            name: "http".to_string(),
            spec: HealthCheckSpec::Http { url: "http://127.0.0.1:1".to_string(), expected_status: 200, timeout_ms: 100 },
            interval: Duration::from_millis(30),
        }],
        failure_threshold: 1,
        success_threshold: 1,
        auto_restart: false,
        restart_cap: 0,
    };
    monitor.watch_app(app_id.clone(), config);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let record = monitor.record(&app_id).expect("health record present");
    assert_ne!(record.overall, HealthStatus::Healthy);

    sup.stop(process_id, pinokio_supervisor::StopOpts::default()).await.ok();
}

#[tokio::test]
async fn process_check_restarts_on_critical_when_auto_restart_enabled() {
    let sup = Supervisor::new(21100, 21110);
    let daemon = pinokio_supervisor::DaemonSpec {
        restart_policy: pinokio_supervisor::RestartPolicy::Never,
        max_restarts: 0,
        backoff: pinokio_supervisor::Backoff::default(),
        health_check: None,
    };
    let process_id = sup
        .start(
            AppId::new("app-crit"),
            vec!["sleep".to_string(), "0.05".to_string()],
            StartOpts { workdir: std::env::temp_dir(), daemon: Some(daemon), ..Default::default() },
        )
        .await
        .expect("start");

    let monitor = HealthMonitor::new(sup.clone());
    let mut events = monitor.watch();
    let app_id = AppId::new("app-crit");
    monitor.watch_app(
        app_id.clone(),
        MonitorConfig {
            process_id: process_id.clone(),
            checks: vec![ScheduledCheck {
                name: "process".to_string(),
                spec: HealthCheckSpec::Process { process_id: process_id.clone() },
                interval: Duration::from_millis(30),
            }],
            failure_threshold: 1,
            success_threshold: 1,
            auto_restart: true,
            restart_cap: 3,
        },
    );

    let mut saw_restart_request = false;
    for _ in 0..20 {
        if let Ok(Ok(pinokio_core::Event::RestartTriggered { .. })) = tokio::time::timeout(Duration::from_millis(200), events.recv()).await {
            saw_restart_request = true;
            break;
        }
    }
    assert!(saw_restart_request, "expected a restart_triggered event once the process exited");
}
