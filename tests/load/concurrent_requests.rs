//! The service state is shared read-only, so concurrent requests must see
//! exactly the answers a single request would.

use axum::http::StatusCode;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use crate::common::{app, post_json, PREDICT_PATH};

async fn run_concurrent(clients: usize) -> Duration {
    let router = app();
    let start = Instant::now();
    let mut set = JoinSet::new();

    for i in 0..clients {
        let router = router.clone();
        set.spawn(async move {
            let windmills = (i % 5) as i64 + 1;
            let body = json!({
                "lat": 0.0,
                "lon": 0.0,
                "windmills": windmills,
                "temperature": 20.0,
                "pressure": 1013.0,
                "windSpeed": 5.0
            });
            let (status, json) = post_json(router, PREDICT_PATH, &body.to_string()).await;
            (windmills, status, json)
        });
    }

    while let Some(result) = set.join_next().await {
        let (windmills, status, json) = result.unwrap();
        assert_eq!(status, StatusCode::OK);

        let expected = ((1.234 * 5.0 + 0.5 * windmills as f64 + 0.0001) * 100.0_f64).round() / 100.0;
        assert_eq!(json["predictedPower"], expected);
        assert_eq!(json["optimalLocation"]["lat"], 0.2);
    }

    start.elapsed()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_agree() {
    run_concurrent(50).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn test_sustained_load() {
    let elapsed = run_concurrent(5_000).await;
    println!("5000 requests in {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(30));
}
