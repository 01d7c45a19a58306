// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shows the logs and metrics a circuit breaker emits.
//!
//! Circuit events are logged to the console through `tracing` and counted in the
//! `circuit.event` OpenTelemetry counter, which is flushed to stdout before exiting.

use std::time::Duration;

use fusebox::{CircuitBreaker, InMemoryStore, OperationError, Outcome};
use ohno::AppError;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_stdout::MetricExporter;
use tick::Clock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let meter_provider = configure_telemetry();
    let clock = Clock::new_tokio();

    let breaker = CircuitBreaker::builder(InMemoryStore::new(), &clock)
        .name("payments")
        .failure_threshold(2)
        .cooldown(Duration::from_millis(200))
        .enable_logs()
        .enable_metrics(&meter_provider)
        .build();

    // Two failures open the circuit, the next call is rejected.
    for _ in 0..3 {
        let _ = breaker.call("card-gateway", || charge(false));
    }

    // The first probe fails and reopens the circuit, the second one closes it.
    clock.delay(Duration::from_millis(250)).await;
    let _ = breaker.call("card-gateway", || charge(false));
    clock.delay(Duration::from_millis(250)).await;
    let receipt = breaker.call("card-gateway", || charge(true))?;
    println!("charged: {}", receipt.into_payload());

    meter_provider.force_flush()?;

    Ok(())
}

fn charge(gateway_up: bool) -> Result<Outcome<&'static str>, OperationError> {
    if gateway_up {
        Ok(Outcome::success("receipt-0001"))
    } else {
        Err(OperationError::from_message("card gateway timed out"))
    }
}

fn configure_telemetry() -> SdkMeterProvider {
    tracing_subscriber::registry().with(tracing_subscriber::fmt::layer()).init();

    SdkMeterProvider::builder()
        .with_periodic_exporter(MetricExporter::default())
        .build()
}
