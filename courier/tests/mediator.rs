use courier::{
    CancellationToken, CapabilityKind, DynRequest, Error, Mediator, Registry, RegistryBuilder,
    WrapperCache,
    behaviors::CancellationBehavior,
    testing::{CallLog, CountingHandler, RecordingBehavior, RecordingNotificationHandler},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::{
    CountedReceipt, CreateOrder, CreateOrderHandler, EmptyOrder, FlakyStock, GetStock, Logging,
    OrderId, OrderPlaced, RECEIPTS_BUILT, RetryOnce, TokenAware, Validation,
};

fn order_mediator(log: &CallLog) -> Mediator {
    Mediator::new(
        Registry::builder()
            .register_behavior::<CreateOrder, _>(Logging { log: log.clone() })
            .register_behavior::<CreateOrder, _>(Validation { log: log.clone() })
            .register_handler::<CreateOrder, _>(CreateOrderHandler { log: log.clone() })
            .build(),
    )
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_behaviors_wrap_handler_outermost_first() {
    let log = CallLog::new();
    let mediator = order_mediator(&log);

    let id = mediator
        .send(CreateOrder::with_items(&["apple", "pear"]), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(id, OrderId(2));
    assert_eq!(
        log.entries(),
        [
            "Logging-before",
            "Validation-before",
            "handler",
            "Validation-after",
            "Logging-after",
        ]
    );
}

#[tokio::test]
async fn test_failing_behavior_skips_handler_and_outer_cleanup_runs() {
    let log = CallLog::new();
    let mediator = order_mediator(&log);

    let err = mediator
        .send(CreateOrder::with_items(&[]), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.downcast_ref::<EmptyOrder>(), Some(&EmptyOrder));
    assert!(!err.is_resolution());
    assert_eq!(
        log.entries(),
        ["Logging-before", "Validation-before", "Logging-after"]
    );
}

#[tokio::test]
async fn test_missing_handler_fails_before_behaviors() {
    let log = CallLog::new();
    let mediator = Mediator::new(
        Registry::builder()
            .register_behavior::<CreateOrder, _>(RecordingBehavior::new("outer", &log))
            .build(),
    );

    let err = mediator
        .send(CreateOrder::with_items(&["apple"]), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::HandlerNotFound { capability } => {
            assert_eq!(capability.kind(), CapabilityKind::RequestHandler);
        }
        other => panic!("expected HandlerNotFound, got {other:?}"),
    }
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_two_handlers_are_ambiguous() {
    let log = CallLog::new();
    let mediator = Mediator::new(
        Registry::builder()
            .register_handler::<CreateOrder, _>(CreateOrderHandler { log: log.clone() })
            .register_handler::<CreateOrder, _>(CreateOrderHandler { log: log.clone() })
            .build(),
    );

    let err = mediator
        .send(CreateOrder::with_items(&["apple"]), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AmbiguousHandler { count: 2, .. }));
    assert!(err.is_resolution());
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_retry_in_one_call_does_not_leak_into_the_next() {
    let log = CallLog::new();
    let stock = FlakyStock::default();
    let mediator = Mediator::new(
        Registry::builder()
            .register_behavior::<GetStock, _>(RetryOnce { log: log.clone() })
            .register_handler::<GetStock, _>(stock.clone())
            .build(),
    );
    let token = CancellationToken::new();

    assert_eq!(mediator.send(GetStock { sku: "A1" }, &token).await.unwrap(), 2);
    assert_eq!(mediator.send(GetStock { sku: "A1" }, &token).await.unwrap(), 4);

    assert_eq!(stock.attempts.load(Ordering::SeqCst), 4);
    assert_eq!(log.entries(), ["retry", "retry"]);
}

#[tokio::test]
async fn test_send_dyn_reaches_the_same_pipeline() {
    let log = CallLog::new();
    let mediator = order_mediator(&log);

    let requests: Vec<Box<dyn DynRequest<OrderId>>> = vec![
        Box::new(CreateOrder::with_items(&["a"])),
        Box::new(CreateOrder::with_items(&["a", "b", "c"])),
    ];

    let token = CancellationToken::new();
    let mut ids = Vec::new();
    for request in requests {
        ids.push(mediator.send_dyn(request, &token).await.unwrap());
    }

    assert_eq!(ids, [OrderId(1), OrderId(3)]);
    assert_eq!(log.entries().iter().filter(|entry| *entry == "handler").count(), 2);
    assert_eq!(mediator.cache().len(), 1);
}

#[tokio::test]
async fn test_cancelled_token_stops_before_handler() {
    let handler = CountingHandler::new(7u32);
    let mediator = Mediator::new(
        Registry::builder()
            .register_behavior::<GetStock, _>(CancellationBehavior)
            .register_handler::<GetStock, _>(handler.clone())
            .build(),
    );

    let token = CancellationToken::new();
    token.cancel();

    let err = mediator.send(GetStock { sku: "B2" }, &token).await.unwrap_err();
    assert!(err.is_canceled());
    assert_eq!(handler.count(), 0);

    let ok = mediator
        .send(GetStock { sku: "B2" }, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(ok, 7);
    assert_eq!(handler.count(), 1);
}

#[tokio::test]
async fn test_handler_receives_caller_token() {
    let mediator = Mediator::new(
        Registry::builder()
            .register_handler::<GetStock, _>(TokenAware)
            .build(),
    );

    let cancelled = CancellationToken::new();
    cancelled.cancel();

    let err = mediator.send(GetStock { sku: "G7" }, &cancelled).await.unwrap_err();
    assert!(matches!(err, Error::Canceled));

    let stock = mediator
        .send(GetStock { sku: "G7" }, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(stock, 3);
}

#[tokio::test]
async fn test_transient_handler_is_built_per_dispatch() {
    let built = Arc::new(AtomicUsize::new(0));
    let factory_built = built.clone();
    let mediator = Mediator::new(
        Registry::builder()
            .register_handler_factory::<GetStock, _, _>(move || {
                factory_built.fetch_add(1, Ordering::SeqCst);
                CountingHandler::new(1u32)
            })
            .build(),
    );
    let token = CancellationToken::new();

    for _ in 0..3 {
        mediator.send(GetStock { sku: "C3" }, &token).await.unwrap();
    }

    assert_eq!(built.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_dispatch_builds_one_wrapper() {
    const CALLS: usize = 32;

    let handler = CountingHandler::new(5u32);
    let mediator = Mediator::new(
        Registry::builder()
            .register_handler::<GetStock, _>(handler.clone())
            .build(),
    );

    let tasks: Vec<_> = (0..CALLS)
        .map(|_| {
            let mediator = mediator.clone();
            tokio::spawn(async move {
                mediator
                    .send(GetStock { sku: "D4" }, &CancellationToken::new())
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 5);
    }

    assert_eq!(handler.count(), CALLS);
    assert_eq!(mediator.cache().len(), 1);
}

#[tokio::test]
async fn test_shared_cache_across_registries() {
    let cache = Arc::new(WrapperCache::new());

    let first = Mediator::builder()
        .bindings(RegistryBuilder::new().register_handler::<GetStock, _>(CountingHandler::new(1u32)))
        .cache(cache.clone())
        .build();
    let second = Mediator::builder()
        .bindings(RegistryBuilder::new().register_handler::<GetStock, _>(CountingHandler::new(2u32)))
        .cache(cache.clone())
        .build();

    let token = CancellationToken::new();
    assert_eq!(first.send(GetStock { sku: "E5" }, &token).await.unwrap(), 1);
    assert_eq!(second.send(GetStock { sku: "E5" }, &token).await.unwrap(), 2);
    assert_eq!(cache.len(), 1);
}

// ============================================================================
// Notifications
// ============================================================================

#[tokio::test]
async fn test_publish_runs_handlers_in_registration_order() {
    let log = CallLog::new();
    let mediator = Mediator::new(
        Registry::builder()
            .register_notification_handler::<OrderPlaced, _>(RecordingNotificationHandler::new("A", &log))
            .register_notification_handler::<OrderPlaced, _>(RecordingNotificationHandler::new("B", &log))
            .register_notification_handler::<OrderPlaced, _>(RecordingNotificationHandler::new("C", &log))
            .build(),
    );

    mediator
        .publish(OrderPlaced { id: OrderId(1) }, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(log.entries(), ["A", "B", "C"]);
}

#[tokio::test]
async fn test_publish_stops_at_first_failure() {
    let log = CallLog::new();
    let mediator = Mediator::new(
        Registry::builder()
            .register_notification_handler::<OrderPlaced, _>(RecordingNotificationHandler::new("A", &log))
            .register_notification_handler::<OrderPlaced, _>(RecordingNotificationHandler::failing("B", &log))
            .register_notification_handler::<OrderPlaced, _>(RecordingNotificationHandler::new("C", &log))
            .build(),
    );

    let err = mediator
        .publish(OrderPlaced { id: OrderId(1) }, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "B failed");
    assert_eq!(log.entries(), ["A", "B"]);
}

#[tokio::test]
async fn test_publish_without_handlers_succeeds() {
    let mediator = Mediator::new(Registry::builder().build());

    let result = mediator
        .publish(OrderPlaced { id: OrderId(9) }, &CancellationToken::new())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_transient_notification_handler() {
    let mediator = Mediator::new(
        Registry::builder()
            .register_notification_handler_factory::<OrderPlaced, _, _>(CountedReceipt::build)
            .build(),
    );
    let token = CancellationToken::new();

    mediator.publish(OrderPlaced { id: OrderId(1) }, &token).await.unwrap();
    mediator.publish(OrderPlaced { id: OrderId(2) }, &token).await.unwrap();

    assert_eq!(RECEIPTS_BUILT.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_notification_handler_receives_caller_token() {
    let log = CallLog::new();
    let mediator = Mediator::new(
        Registry::builder()
            .register_notification_handler::<OrderPlaced, _>(TokenAware)
            .register_notification_handler::<OrderPlaced, _>(RecordingNotificationHandler::new("after", &log))
            .build(),
    );

    let cancelled = CancellationToken::new();
    cancelled.cancel();

    let err = mediator
        .publish(OrderPlaced { id: OrderId(4) }, &cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Canceled));
    assert!(log.is_empty());

    mediator
        .publish(OrderPlaced { id: OrderId(4) }, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(log.entries(), ["after"]);
}
