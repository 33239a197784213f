//! Shared helpers for poller integration tests

#![allow(dead_code)]

use std::time::Duration;

use mockito::{Matcher, Mock, ServerGuard};
use zkill_redisq::{Poller, PollerBuilder};

pub const LISTEN_PATH: &str = "/listen.php";

/// Upper bound for any single wait on a channel
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub const NULL_PACKAGE: &str = r#"{"package":null}"#;

/// Minimal RedisQ response carrying a kill with the given ID
pub fn kill_body(id: u64) -> String {
    serde_json::json!({
        "package": {
            "killID": id,
            "killmail": {
                "killID": id,
                "killTime": "2017.02.02 19:51:15",
                "solarSystem": {"id": 30000142, "name": "Jita"},
                "attackers": [{"finalBlow": true, "damageDone": 100}],
                "attackerCount": 1,
                "victim": {"damageTaken": 100, "items": []}
            },
            "zkb": {"totalValue": 1000.5, "points": 1, "hash": "abc"}
        }
    })
    .to_string()
}

pub fn endpoint(server: &ServerGuard) -> String {
    format!("{}{}", server.url(), LISTEN_PATH)
}

/// Builder pointed at the mock server with a client that gives up quickly
pub fn builder_for(server: &ServerGuard) -> PollerBuilder {
    let client = reqwest::blocking::Client::builder()
        .timeout(RECV_TIMEOUT)
        .build()
        .expect("Failed to build test client");

    PollerBuilder::new().endpoint(endpoint(server)).client(client)
}

pub fn poller_for(server: &ServerGuard) -> Poller {
    builder_for(server).build().expect("Failed to build poller")
}

/// Mock answering every poll with the given status and body
pub fn mock_listen(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", LISTEN_PATH)
        .match_query(Matcher::Any)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}
