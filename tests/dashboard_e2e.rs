mod common;

use chain_dashboard::core::api::ApiClient;
use chain_dashboard::core::batch::{BatchSubmitter, GeneratorRequest};
use chain_dashboard::core::poller::MinerPoolPoller;
use chain_dashboard::core::router::Route;
use chain_dashboard::core::{server, Dashboard, MetricsCollector};
use chain_dashboard::render::Node;
use chain_dashboard::utils::error::DashboardError;
use chain_dashboard::views::{self, dashboard, statistics, ViewContext};
use common::{fixture_blocks, spawn, Behaviour, FakeBackend};
use std::time::Duration;

fn text_of(node: &Node, id: &str) -> String {
    Node::from(node.find_by_id(id).unwrap_or_else(|| panic!("missing #{}", id)).clone()).text_content()
}

fn api(backend: &FakeBackend) -> ApiClient {
    ApiClient::new(&backend.config(), MetricsCollector::default()).unwrap()
}

fn submitter(backend: &FakeBackend) -> BatchSubmitter {
    BatchSubmitter::new(api(backend), 4, Duration::ZERO, MetricsCollector::default())
}

#[tokio::test]
async fn dashboard_cards_match_the_fixture() {
    let backend = spawn(fixture_blocks(), Behaviour::default()).await;
    let node = dashboard::load(&api(&backend)).await;

    assert_eq!(text_of(&node, "total-blocks"), "3");
    assert_eq!(text_of(&node, "pending-tx-count"), "2");
    assert_eq!(text_of(&node, "latest-block-index"), "2");
    assert_eq!(text_of(&node, "latest-block-txs"), "1");
}

#[tokio::test]
async fn failing_pending_count_shows_error_in_its_card_only() {
    let backend = spawn(fixture_blocks(), Behaviour { fail_count: true, ..Behaviour::default() }).await;
    let node = dashboard::load(&api(&backend)).await;

    assert_eq!(text_of(&node, "pending-tx-count"), "Error");
    assert_eq!(text_of(&node, "total-blocks"), "3");
}

#[tokio::test]
async fn non_array_batch_makes_no_calls() {
    let backend = spawn(fixture_blocks(), Behaviour::default()).await;

    let result = submitter(&backend)
        .submit_json(r#"{"sender":"a","receiver":"b","amount":1}"#)
        .await;

    assert!(matches!(result, Err(DashboardError::Validation(_))));
    assert_eq!(backend.created(), 0);
}

#[tokio::test]
async fn generator_sends_every_group() {
    let backend = spawn(fixture_blocks(), Behaviour::default()).await;

    let report = submitter(&backend)
        .generate(GeneratorRequest::new(7, 3).unwrap())
        .await
        .unwrap();

    assert_eq!(report.sent, 7);
    assert_eq!(report.batches, 3);
    assert_eq!(backend.created(), 7);
}

#[tokio::test]
async fn statistics_fold_the_whole_chain() {
    let backend = spawn(fixture_blocks(), Behaviour::default()).await;
    let data = statistics::fetch(&api(&backend)).await;
    let stats = data.stats.expect("chain is not empty");

    assert_eq!(stats.total_blocks, 3);
    assert_eq!(stats.total_transactions, 3);
    assert_eq!(stats.avg_block_time, 60.0);
    assert_eq!(stats.min_first_tx_delay, Some(10));
    assert_eq!(stats.max_first_tx_delay, Some(20));
    assert_eq!(data.pending_count, "2");
}

#[tokio::test]
async fn empty_chain_statistics_render_the_info_message() {
    let backend = spawn(vec![], Behaviour::default()).await;
    let data = statistics::fetch(&api(&backend)).await;

    assert!(data.stats.is_none());
    let node = statistics::view(&data);
    assert!(node.text_content().contains(statistics::EMPTY_MESSAGE));
}

#[tokio::test]
async fn block_list_clamps_pages_past_the_end() {
    let backend = spawn(fixture_blocks(), Behaviour::default()).await;
    let poller = MinerPoolPoller::new(api(&backend));
    let client = api(&backend);
    let ctx = ViewContext {
        api: &client,
        poller: &poller,
        page_size: 2,
    };

    let node = views::load(&ctx, &Route::Blocks { page: 9 }, None).await;
    let next = node.find_by_id("next-page").unwrap();
    assert!(next.get_attr("disabled").is_some());
    assert_eq!(node.find_by_id("prev-page").and_then(|e| e.get_attr("href")), Some("/blocks"));
    assert!(node.text_content().contains("0000bbbb2222"));
    assert_eq!(
        node.find_by_id("genesis-block").and_then(|e| e.get_attr("href")),
        Some("/blocks/0000genesis")
    );
}

#[tokio::test]
async fn latest_detail_on_an_empty_chain_warns() {
    let backend = spawn(vec![], Behaviour::default()).await;
    let poller = MinerPoolPoller::new(api(&backend));
    let client = api(&backend);
    let ctx = ViewContext {
        api: &client,
        poller: &poller,
        page_size: 2,
    };

    let node = views::load(&ctx, &Route::BlockDetail("latest".into()), None).await;
    assert!(node.text_content().contains("No se encontró el bloque con hash: latest."));
}

#[tokio::test]
async fn server_renders_pages_and_actions() {
    let backend = spawn(fixture_blocks(), Behaviour::default()).await;
    let dashboard = Dashboard::new(backend.config()).await.unwrap();
    let routes = server::routes(dashboard.state());

    let res = warp::test::request().path("/blocks/latest").reply(&routes).await;
    assert_eq!(res.status(), 200);
    let cookie = res.headers().get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.starts_with(server::SESSION_COOKIE));
    let body = String::from_utf8_lossy(res.body()).to_string();
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("Bloque #2"));
    assert!(body.contains("Online"));

    let res = warp::test::request().path("/wallet").reply(&routes).await;
    assert_eq!(res.status(), 404);

    let payload = r#"[{"sender":"a","receiver":"b","amount":1},{"sender":"c","receiver":"d","amount":2}]"#;
    let res = warp::test::request()
        .method("POST")
        .path("/transactions/batch")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(serde_urlencoded::to_string([("payload", payload)]).unwrap())
        .reply(&routes)
        .await;
    assert_eq!(res.status(), 200);
    assert!(String::from_utf8_lossy(res.body()).contains("Transacciones enviadas con éxito!"));
    assert_eq!(backend.created(), 2);

    let res = warp::test::request()
        .method("POST")
        .path("/transactions/generate")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("total=5000&batch_size=5")
        .reply(&routes)
        .await;
    assert!(String::from_utf8_lossy(res.body()).contains("(1-1000)"));
    assert_eq!(backend.created(), 2);

    let res = warp::test::request()
        .method("POST")
        .path("/miner-pool/difficulty")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("difficulty=000000")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), 200);
    assert!(String::from_utf8_lossy(res.body()).contains("Dificultad actualizada a 000000"));

    let res = warp::test::request().path("/health").reply(&routes).await;
    assert_eq!(res.status(), 200);
}
