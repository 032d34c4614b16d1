//! In-process stand-in for the chain node and the pool coordinator.

#![allow(dead_code)]

use chain_dashboard::config::Config;
use chain_dashboard::models::{Block, Transaction};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use warp::http::StatusCode;
use warp::Filter;

pub struct FakeBackend {
    pub addr: SocketAddr,
    pub created: Arc<AtomicUsize>,
    pub difficulty: Arc<Mutex<String>>,
}

impl FakeBackend {
    pub fn base(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn config(&self) -> Config {
        Config {
            node_api_base: self.base(),
            pool_api_base: self.base(),
            metrics_port: 0,
            page_size: 2,
            stats_page_size: 2,
            stats_page_delay_ms: 0,
            batch_delay_ms: 0,
            batch_concurrency: 4,
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Default)]
pub struct Behaviour {
    pub fail_count: bool,
    pub fail_status: bool,
}

pub fn transaction(id: &str, timestamp: i64, amount: f64) -> Transaction {
    Transaction {
        id: id.to_string(),
        sender: format!("sender-{}", id),
        receiver: format!("receiver-{}", id),
        amount,
        timestamp,
    }
}

/// Three blocks one minute apart with 0, 2 and 1 transactions.
pub fn fixture_blocks() -> Vec<Block> {
    vec![
        Block {
            index: 0,
            hash: "0000genesis".into(),
            previous_hash: "0".into(),
            nonce: 11,
            timestamp: 1_700_000_000,
            data: vec![],
        },
        Block {
            index: 1,
            hash: "0000aaaa1111".into(),
            previous_hash: "0000genesis".into(),
            nonce: 2_345,
            timestamp: 1_700_000_060,
            data: vec![transaction("tx-1", 1_700_000_050, 10.0), transaction("tx-2", 1_700_000_055, 30.0)],
        },
        Block {
            index: 2,
            hash: "0000bbbb2222".into(),
            previous_hash: "0000aaaa1111".into(),
            nonce: 67_890,
            timestamp: 1_700_000_120,
            data: vec![transaction("tx-3", 1_700_000_100, 5.0)],
        },
    ]
}

pub fn pending_transactions() -> Vec<Transaction> {
    vec![transaction("pending-1", 1_700_000_130, 1.0), transaction("pending-2", 1_700_000_131, 2.0)]
}

pub async fn spawn(blocks: Vec<Block>, behaviour: Behaviour) -> FakeBackend {
    let blocks = Arc::new(blocks);
    let created = Arc::new(AtomicUsize::new(0));
    let difficulty = Arc::new(Mutex::new("0000".to_string()));

    let status = warp::path!("api" / "blocks" / "status").and(warp::get()).map(move || {
        let code = if behaviour.fail_status {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::OK
        };
        warp::reply::with_status(warp::reply::json(&json!({ "message": "Coordinator is healthy" })), code)
    });

    let latest = {
        let blocks = blocks.clone();
        warp::path!("api" / "blocks" / "latest").and(warp::get()).map(move || match blocks.last() {
            Some(block) => warp::reply::with_status(warp::reply::json(block), StatusCode::OK),
            None => warp::reply::with_status(
                warp::reply::json(&json!({ "message": "No blocks" })),
                StatusCode::NOT_FOUND,
            ),
        })
    };

    let by_hash = {
        let blocks = blocks.clone();
        warp::path!("api" / "blocks" / String).and(warp::get()).map(move |hash: String| {
            match blocks.iter().find(|block| block.hash == hash) {
                Some(block) => warp::reply::with_status(warp::reply::json(block), StatusCode::OK),
                None => warp::reply::with_status(
                    warp::reply::json(&json!({ "message": "Block not found" })),
                    StatusCode::NOT_FOUND,
                ),
            }
        })
    };

    let list = {
        let blocks = blocks.clone();
        warp::path!("api" / "blocks")
            .and(warp::get())
            .and(warp::query::<HashMap<String, String>>())
            .map(move |query: HashMap<String, String>| {
                let page: usize = query.get("page").and_then(|v| v.parse().ok()).unwrap_or(0);
                let size: usize = query.get("size").and_then(|v| v.parse().ok()).unwrap_or(10).max(1);
                let items: Vec<&Block> = blocks.iter().skip(page * size).take(size).collect();
                warp::reply::json(&json!({
                    "_embedded": { "blockList": items },
                    "_links": { "self": { "href": "http://node/api/blocks" } },
                    "page": {
                        "size": size,
                        "totalElements": blocks.len(),
                        "totalPages": blocks.len().div_ceil(size),
                        "number": page
                    }
                }))
            })
    };

    let pending_count = warp::path!("api" / "transactions" / "pending" / "count")
        .and(warp::get())
        .map(move || {
            if behaviour.fail_count {
                warp::reply::with_status(
                    warp::reply::json(&json!({ "message": "Pool unavailable" })),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            } else {
                warp::reply::with_status(
                    warp::reply::json(&json!({ "count": pending_transactions().len() })),
                    StatusCode::OK,
                )
            }
        });

    let pending = warp::path!("api" / "transactions" / "pending").and(warp::get()).map(|| {
        warp::reply::json(&json!({ "_embedded": { "transactionList": pending_transactions() } }))
    });

    let create = {
        let created = created.clone();
        warp::path!("api" / "transactions")
            .and(warp::post())
            .and(warp::body::json::<serde_json::Value>())
            .map(move |body: serde_json::Value| {
                let n = created.fetch_add(1, Ordering::SeqCst) + 1;
                warp::reply::with_status(
                    warp::reply::json(&json!({
                        "id": format!("created-{}", n),
                        "sender": body["sender"],
                        "receiver": body["receiver"],
                        "amount": body["amount"],
                        "timestamp": 1_700_000_200
                    })),
                    StatusCode::CREATED,
                )
            })
    };

    let miners = warp::path!("api" / "pools" / "miners").and(warp::get()).map(|| {
        warp::reply::json(&json!({
            "_embedded": { "minerList": [
                { "publicKey": "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAwx", "lastTimestamp": 1_700_000_000_000i64, "gpuMiner": true },
                { "publicKey": "cpu-miner-key", "lastTimestamp": "2023-11-14T22:13:20.000+00:00", "gpuMiner": false }
            ] }
        }))
    });

    let get_difficulty = {
        let difficulty = difficulty.clone();
        warp::path!("api" / "difficulty")
            .and(warp::get())
            .map(move || difficulty.lock().map(|d| d.clone()).unwrap_or_default())
    };

    let set_difficulty = {
        let difficulty = difficulty.clone();
        warp::path!("api" / "difficulty")
            .and(warp::post())
            .and(warp::body::json::<serde_json::Value>())
            .map(move |body: serde_json::Value| {
                let value = body["difficulty"].as_str().unwrap_or_default().to_string();
                if let Ok(mut current) = difficulty.lock() {
                    *current = value.clone();
                }
                format!("Dificultad actualizada a {}", value)
            })
    };

    let routes = status
        .or(latest)
        .or(pending_count)
        .or(pending)
        .or(by_hash)
        .or(list)
        .or(create)
        .or(miners)
        .or(get_difficulty)
        .or(set_difficulty);

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    FakeBackend {
        addr,
        created,
        difficulty,
    }
}
