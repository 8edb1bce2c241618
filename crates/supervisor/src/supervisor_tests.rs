use crate::{DaemonSpec, RestartPolicy, StartOpts, StopOpts, Supervisor};
use pinokio_core::{AppId, ProcessStatus};
use std::time::Duration;

#[tokio::test]
async fn start_and_list_tracks_the_process() {
    let sup = Supervisor::new(20000, 20010);
    let id = sup
        .start(
            AppId::new("app-a"),
            vec!["sleep".to_string(), "5".to_string()],
            StartOpts { workdir: std::env::temp_dir(), ..Default::default() },
        )
        .await
        .expect("start");

    let record = sup.get(&id).expect("record present");
    assert_eq!(record.status, ProcessStatus::Running);

    sup.stop(id.clone(), StopOpts { grace: Duration::from_millis(200), force_after: Duration::from_millis(200) })
        .await
        .expect("stop");

    tokio::time::sleep(Duration::from_millis(100)).await;
    let record = sup.get(&id).expect("record still present after stop");
    assert!(record.is_terminal(), "expected terminal status, got {:?}", record.status);
}

#[tokio::test]
async fn stop_releases_the_owned_port() {
    let sup = Supervisor::new(20100, 20110);
    let id = sup
        .start(
            AppId::new("app-b"),
            vec!["sleep".to_string(), "5".to_string()],
            StartOpts { workdir: std::env::temp_dir(), needs_port: true, ..Default::default() },
        )
        .await
        .expect("start");
    let port = sup.get(&id).expect("record").ports_owned[0];

    sup.stop(id, StopOpts { grace: Duration::from_millis(200), force_after: Duration::from_millis(200) })
        .await
        .expect("stop");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let id2 = sup
        .start(
            AppId::new("app-c"),
            vec!["sleep".to_string(), "5".to_string()],
            StartOpts { workdir: std::env::temp_dir(), needs_port: true, port: Some(port), ..Default::default() },
        )
        .await
        .expect("reallocate freed port");
    assert_eq!(sup.get(&id2).unwrap().ports_owned[0], port);

    sup.stop(id2, StopOpts::default()).await.ok();
}

#[tokio::test]
async fn daemon_restarts_on_failure_up_to_cap() {
    let sup = Supervisor::new(20200, 20210);
    let daemon = DaemonSpec {
        restart_policy: RestartPolicy::OnFailure,
        max_restarts: 1,
        backoff: crate::Backoff { initial: Duration::from_millis(10), max: Duration::from_millis(20), multiplier: 1.0 },
        health_check: None,
    };
    let id = sup
        .start(
            AppId::new("app-d"),
            vec!["false".to_string()],
            StartOpts { workdir: std::env::temp_dir(), daemon: Some(daemon), ..Default::default() },
        )
        .await
        .expect("start");

    let mut events = sup.watch();
    let mut cap_reached = false;
    for _ in 0..20 {
        if let Ok(ev) = tokio::time::timeout(Duration::from_millis(500), events.recv()).await {
            if let Ok(pinokio_core::Event::RestartCapReached { .. }) = ev {
                cap_reached = true;
                break;
            }
        } else {
            break;
        }
    }
    assert!(cap_reached, "expected restart_cap_reached within the restart budget");
    let _ = id;
}

#[tokio::test]
async fn restart_stops_and_relaunches_with_original_command() {
    let sup = Supervisor::new(20300, 20310);
    let id = sup
        .start(
            AppId::new("app-e"),
            vec!["sleep".to_string(), "5".to_string()],
            StartOpts { workdir: std::env::temp_dir(), ..Default::default() },
        )
        .await
        .expect("start");

    let new_id = sup.restart(id.clone()).await.expect("restart");
    assert_ne!(new_id, id);
    let record = sup.get(&new_id).expect("new record present");
    assert_eq!(record.command, vec!["sleep".to_string(), "5".to_string()]);
    assert_eq!(record.restart_count, 1);

    sup.stop(new_id, StopOpts { grace: Duration::from_millis(200), force_after: Duration::from_millis(200) }).await.ok();
}
