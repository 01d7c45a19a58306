// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Loads circuit breaker settings from JSON.
//!
//! Durations use the ISO 8601 format and any missing setting keeps its default.

use fusebox::{BreakerConfig, CircuitBreaker, InMemoryStore, OperationError, Outcome};
use ohno::AppError;
use tick::Clock;

const SETTINGS: &str = r#"{
    "search": { "failure_threshold": 5, "cooldown": "PT30S" },
    "billing": { "cooldown": "PT2M" }
}"#;

#[derive(Debug, serde::Deserialize)]
struct Settings {
    search: BreakerConfig,
    billing: BreakerConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let settings: Settings = serde_json::from_str(SETTINGS)?;
    let clock = Clock::new_tokio();

    let search = CircuitBreaker::builder(InMemoryStore::new(), &clock)
        .name("search")
        .config(&settings.search)
        .build();
    let billing = CircuitBreaker::builder(InMemoryStore::new(), &clock)
        .name("billing")
        .config(&settings.billing)
        .build();

    for breaker in [&search, &billing] {
        println!(
            "{}: opens after {} failures, cools down for {:?}",
            breaker.name(),
            breaker.failure_threshold(),
            breaker.cooldown()
        );
    }

    let hits = search.call_async("catalog", || async { Ok::<_, OperationError>(Outcome::success(12)) }).await?;
    println!("search returned {} hits", hits.into_payload());

    println!("effective search settings: {}", serde_json::to_string(&settings.search)?);

    Ok(())
}
