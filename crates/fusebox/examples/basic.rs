// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Guards a flaky inventory service with a circuit breaker.
//!
//! The service fails for a while and then recovers. The output shows the circuit opening
//! after three consecutive failures, rejecting calls while it cools down, and closing again
//! once a probe call succeeds.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use fusebox::{CircuitBreaker, InMemoryStore, OperationError, Outcome};
use ohno::AppError;
use tick::Clock;

// The service is down for the first ten requests it receives.
static RECEIVED: AtomicU32 = AtomicU32::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let clock = Clock::new_tokio();

    let breaker = CircuitBreaker::builder(InMemoryStore::new(), &clock)
        .failure_threshold(3)
        .cooldown(Duration::from_millis(300))
        .build();

    for attempt in 0..20 {
        clock.delay(Duration::from_millis(50)).await;

        match breaker.call_async("inventory", || check_stock("sku-42")).await {
            Ok(outcome) => println!("{attempt}: {} units", outcome.into_payload()),
            Err(e) => println!("{attempt}: {e}"),
        }

        println!("    circuit is {}", breaker.snapshot("inventory")?.state);
    }

    Ok(())
}

async fn check_stock(sku: &str) -> Result<Outcome<u32>, OperationError> {
    if RECEIVED.fetch_add(1, Ordering::Relaxed) < 10 {
        return Err(OperationError::from_message(format!("inventory service unavailable for '{sku}'")));
    }

    Ok(Outcome::success(17))
}
