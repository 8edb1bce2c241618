use super::*;

#[tokio::test]
async fn run_captures_stdout_and_exit_code() {
    let out = run("echo", &["hello".to_string()], ExecOptions::default()).await.expect("run");
    assert_eq!(out.exit_code, Some(0));
    assert_eq!(out.stdout.trim(), "hello");
}

#[tokio::test]
async fn run_reports_nonzero_exit_code() {
    let out = run("false", &[], ExecOptions::default()).await.expect("run");
    assert_eq!(out.exit_code, Some(1));
}

#[tokio::test]
async fn run_times_out_long_running_command() {
    let opts = ExecOptions { timeout: Some(Duration::from_millis(50)), ..Default::default() };
    let err = run("sleep", &["5".to_string()], opts).await.unwrap_err();
    assert!(matches!(err, ShellError::Timeout(_)));
}

#[tokio::test]
async fn run_streaming_yields_line_records_in_order() {
    let cancel = CancellationToken::new();
    let (mut rx, _pid, handle) = run_streaming(
        "sh",
        &["-c".to_string(), "echo one; echo two".to_string()],
        ExecOptions::default(),
        cancel,
    )
    .await
    .expect("spawn");

    let mut lines = Vec::new();
    while let Some(rec) = rx.recv().await {
        lines.push(rec.line);
    }
    let exit = handle.await.expect("join").expect("exec");
    assert_eq!(exit, Some(0));
    assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
}

#[tokio::test]
async fn run_streaming_cancellation_reaps_the_child() {
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let (_rx, _pid, handle) = run_streaming(
        "sleep",
        &["30".to_string()],
        ExecOptions { kill_tree_on_cancel: true, ..Default::default() },
        cancel,
    )
    .await
    .expect("spawn");

    cancel_clone.cancel();
    let result = handle.await.expect("join");
    assert!(matches!(result, Err(ShellError::Cancelled)));
}
