//! Lifecycle and middleware integration tests for the supervised server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use modrelay::config::ServerConfig;
use modrelay::handler::UpstreamRelay;
use modrelay::http::HttpServer;
use modrelay::transport::Transport;
use url::Url;

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn path_prefix_is_stripped_before_the_handler() {
    let mut config = ServerConfig::default();
    config.path_prefix = "/proxy".to_string();
    let (addr, trigger, task) = common::spawn_server(config, Arc::new(common::EchoHandler)).await;

    let res = client()
        .get(format!("http://{addr}/proxy/mod/info"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "/mod/info");

    // A request without the prefix passes through unmodified.
    let res = client()
        .get(format!("http://{addr}/other"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "/other");

    let _ = trigger.send(());
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn fetch_timeout_bounds_slow_handlers() {
    let mut config = ServerConfig::default();
    config.timeouts.fetch_secs = 1;
    let (addr, trigger, task) = common::spawn_server(
        config,
        Arc::new(common::SlowHandler(Duration::from_secs(30))),
    )
    .await;

    let start = Instant::now();
    let res = client()
        .get(format!("http://{addr}/slow"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 504);
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "control must return no later than the fetch timeout"
    );

    let _ = trigger.send(());
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn zero_fetch_timeout_arms_no_deadline() {
    let mut config = ServerConfig::default();
    config.timeouts.fetch_secs = 0;
    let (addr, trigger, task) = common::spawn_server(
        config,
        Arc::new(common::SlowHandler(Duration::from_secs(2))),
    )
    .await;

    let res = client()
        .get(format!("http://{addr}/slow"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "/slow");

    let _ = trigger.send(());
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn shutdown_is_bounded_by_the_grace_period() {
    let mut config = ServerConfig::default();
    config.timeouts.shutdown_secs = 1;
    let (addr, trigger, task) = common::spawn_server(
        config,
        Arc::new(common::SlowHandler(Duration::from_secs(30))),
    )
    .await;

    // An in-flight request that will not finish on its own.
    let c = client();
    let pending = tokio::spawn(async move { c.get(format!("http://{addr}/hang")).send().await });
    tokio::time::sleep(Duration::from_millis(200)).await;

    let triggered_at = Instant::now();
    let _ = trigger.send(());
    task.await.unwrap().unwrap();
    assert!(
        triggered_at.elapsed() < Duration::from_secs(5),
        "remaining connections must be force-closed at the grace deadline"
    );

    let _ = pending.await;
}

#[tokio::test]
async fn signal_triggered_shutdown_returns_ok() {
    let (_, trigger, task) =
        common::spawn_server(ServerConfig::default(), Arc::new(common::EchoHandler)).await;

    let _ = trigger.send(());
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn serve_error_triggers_shutdown_without_a_signal() {
    // Occupy a port, then point the server at it.
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = occupied.local_addr().unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();
    let server = HttpServer::new(config, Arc::new(common::EchoHandler));

    let result = server.run_until(std::future::pending()).await;
    assert!(
        result.is_err(),
        "bind conflict must surface as the terminal error"
    );
}

#[tokio::test]
async fn shutdown_requests_after_completion_are_noops() {
    let config = ServerConfig::default();
    let server = HttpServer::new(config, Arc::new(common::EchoHandler));
    let handle = server.handle();

    let (trigger, triggered) = tokio::sync::oneshot::channel::<()>();
    let task = tokio::spawn(server.run_until(async move {
        let _ = triggered.await;
    }));
    handle.listening().await.expect("server failed to start");

    let _ = trigger.send(());
    task.await.unwrap().unwrap();

    // Asking a stopped server to shut down again must not panic.
    handle.graceful_shutdown(Some(Duration::from_secs(1)));
    handle.shutdown();
}

#[cfg(unix)]
#[tokio::test]
async fn relay_serves_a_local_module_mirror_end_to_end() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let module_dir = dir.path().join("example.com/mod/@v");
    std::fs::create_dir_all(&module_dir).unwrap();
    let mut file = std::fs::File::create(module_dir.join("list")).unwrap();
    writeln!(file, "v1.0.0").unwrap();

    let transport = Arc::new(Transport::new(Duration::from_secs(5), false).unwrap());
    let upstream = Url::parse(&format!("file://{}", dir.path().display())).unwrap();
    let relay = Arc::new(UpstreamRelay::new(upstream, transport));

    let (addr, trigger, task) = common::spawn_server(ServerConfig::default(), relay).await;

    let res = client()
        .get(format!("http://{addr}/example.com/mod/@v/list"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "v1.0.0\n");

    // Outside the mirror: the file transport reports the filesystem error
    // and the relay maps it to a gateway failure.
    let res = client()
        .get(format!("http://{addr}/example.com/mod/@v/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);

    let _ = trigger.send(());
    task.await.unwrap().unwrap();
}
