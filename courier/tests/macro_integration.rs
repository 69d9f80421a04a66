//! Integration tests for courier macros.

#![cfg(feature = "macros")]

use courier::{
    CancellationToken, Capability, Error, Lifetime, Mediator, Next, NotificationHandler,
    PipelineBehavior, Registry, Request, RequestHandler, testing::CallLog,
};
use std::sync::{
    LazyLock,
    atomic::{AtomicUsize, Ordering},
};

/// Labels pushed by the registered components. Every test in this file
/// shares the collected registrations, but only one test dispatches `Reserve`.
static TRAIL: LazyLock<CallLog> = LazyLock::new(CallLog::new);

fn take_trail() -> Vec<String> {
    let entries = TRAIL.entries();
    TRAIL.clear();
    entries
}

// ============================================================================
// Derives
// ============================================================================

#[derive(Debug, courier::Request)]
#[request(response = u64)]
struct Reserve {
    seats: u64,
}

#[derive(Debug, courier::Request)]
struct Ping;

#[derive(Debug, courier::Notification)]
struct Reserved {
    seats: u64,
}

fn response_name<R: Request>() -> &'static str {
    std::any::type_name::<R::Response>()
}

#[test]
fn test_derive_request_response_types() {
    assert_eq!(response_name::<Reserve>(), "u64");
    assert_eq!(response_name::<Ping>(), "()");
}

// ============================================================================
// #[register]
// ============================================================================

#[derive(Default)]
struct ReserveHandler;

#[courier::register]
impl RequestHandler<Reserve> for ReserveHandler {
    async fn handle(&self, request: &Reserve, _: &CancellationToken) -> Result<u64, Error> {
        TRAIL.push("handler");
        Ok(request.seats * 10)
    }
}

#[derive(Default)]
struct Audit;

#[courier::register(order = -1)]
impl PipelineBehavior<Reserve> for Audit {
    async fn handle(
        &self,
        _: &Reserve,
        next: Next<'_, u64>,
        _: &CancellationToken,
    ) -> Result<u64, Error> {
        TRAIL.push("audit");
        next.await
    }
}

#[derive(Default)]
struct Quota;

#[courier::register(order = 5)]
impl PipelineBehavior<Reserve> for Quota {
    async fn handle(
        &self,
        request: &Reserve,
        next: Next<'_, u64>,
        _: &CancellationToken,
    ) -> Result<u64, Error> {
        TRAIL.push("quota");
        if request.seats > 4 {
            return Err("too many seats".into());
        }
        next.await
    }
}

static NOTIFIED: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct CountReserved;

#[courier::register]
impl NotificationHandler<Reserved> for CountReserved {
    async fn handle(&self, notification: &Reserved, _: &CancellationToken) -> Result<(), Error> {
        NOTIFIED.fetch_add(notification.seats as usize, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct PingHandler;

#[courier::register]
impl RequestHandler<Ping> for PingHandler {
    async fn handle(&self, _: &Ping, _: &CancellationToken) -> Result<(), Error> {
        Ok(())
    }
}

fn collected() -> Registry {
    Registry::builder().scan_collected().build()
}

#[test]
fn test_register_binds_transient_factories() {
    let registry = collected();

    assert_eq!(registry.count(&Capability::pipeline_behavior::<Reserve>()), 2);
    assert_eq!(registry.count(&Capability::request_handler::<Reserve>()), 1);
    assert_eq!(registry.count(&Capability::notification_handler::<Reserved>()), 1);

    let behaviors: Vec<_> = registry
        .registrations(&Capability::pipeline_behavior::<Reserve>())
        .collect();
    assert!(behaviors.iter().all(|info| info.lifetime == Lifetime::Transient));
    assert!(behaviors[0].implementation.ends_with("Audit"));
    assert!(behaviors[1].implementation.ends_with("Quota"));
}

#[tokio::test]
async fn test_collected_pipeline_runs_in_order() {
    let mediator = Mediator::new(collected());
    let token = CancellationToken::new();

    take_trail();
    assert_eq!(mediator.send(Reserve { seats: 2 }, &token).await.unwrap(), 20);
    assert_eq!(take_trail(), ["audit", "quota", "handler"]);

    let err = mediator.send(Reserve { seats: 9 }, &token).await.unwrap_err();
    assert_eq!(err.to_string(), "too many seats");
    assert_eq!(take_trail(), ["audit", "quota"]);

    mediator.send(Ping, &token).await.unwrap();
}

#[tokio::test]
async fn test_collected_notification_handler() {
    let mediator = Mediator::new(collected());

    mediator
        .publish(Reserved { seats: 3 }, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(NOTIFIED.load(Ordering::SeqCst), 3);
}
