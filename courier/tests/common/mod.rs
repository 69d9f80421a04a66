#![allow(dead_code)]

use courier::{
    CancellationToken, Error, Next, Notification, NotificationHandler, PipelineBehavior, Request,
    RequestHandler, ensure_active, testing::CallLog,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Message Types
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderId(pub u64);

#[derive(Clone, Debug)]
pub struct CreateOrder {
    pub items: Vec<String>,
}

impl Request for CreateOrder {
    type Response = OrderId;
}

impl CreateOrder {
    pub fn with_items(items: &[&str]) -> Self {
        Self {
            items: items.iter().map(|item| item.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GetStock {
    pub sku: &'static str,
}

impl Request for GetStock {
    type Response = u32;
}

#[derive(Clone, Debug)]
pub struct OrderPlaced {
    pub id: OrderId,
}

impl Notification for OrderPlaced {}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("order must contain at least one item")]
pub struct EmptyOrder;

// ============================================================================
// Handlers and Behaviors
// ============================================================================

/// Answers with the item count as the order id and logs `"handler"`.
pub struct CreateOrderHandler {
    pub log: CallLog,
}

impl RequestHandler<CreateOrder> for CreateOrderHandler {
    async fn handle(&self, request: &CreateOrder, _: &CancellationToken) -> Result<OrderId, Error> {
        self.log.push("handler");
        Ok(OrderId(request.items.len() as u64))
    }
}

/// Brackets the chain with `Logging-before` / `Logging-after`; the after
/// entry is written on every outcome.
pub struct Logging {
    pub log: CallLog,
}

impl PipelineBehavior<CreateOrder> for Logging {
    async fn handle(
        &self,
        _: &CreateOrder,
        next: Next<'_, OrderId>,
        _: &CancellationToken,
    ) -> Result<OrderId, Error> {
        self.log.push("Logging-before");
        let result = next.await;
        self.log.push("Logging-after");
        result
    }
}

/// Rejects orders without items before the handler runs.
pub struct Validation {
    pub log: CallLog,
}

impl PipelineBehavior<CreateOrder> for Validation {
    async fn handle(
        &self,
        request: &CreateOrder,
        next: Next<'_, OrderId>,
        _: &CancellationToken,
    ) -> Result<OrderId, Error> {
        self.log.push("Validation-before");
        if request.items.is_empty() {
            return Err(Error::custom(EmptyOrder));
        }
        let result = next.await;
        self.log.push("Validation-after");
        result
    }
}

/// Runs the rest of the chain a second time if the first attempt fails.
pub struct RetryOnce {
    pub log: CallLog,
}

impl PipelineBehavior<GetStock> for RetryOnce {
    async fn handle(
        &self,
        _: &GetStock,
        next: Next<'_, u32>,
        _: &CancellationToken,
    ) -> Result<u32, Error> {
        match next.run().await {
            Ok(stock) => Ok(stock),
            Err(_) => {
                self.log.push("retry");
                next.run().await
            }
        }
    }
}

/// Fails every odd-numbered attempt and answers with the attempt count otherwise.
#[derive(Clone, Default)]
pub struct FlakyStock {
    pub attempts: Arc<AtomicUsize>,
}

impl RequestHandler<GetStock> for FlakyStock {
    async fn handle(&self, _: &GetStock, _: &CancellationToken) -> Result<u32, Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt % 2 == 1 {
            Err(format!("attempt {attempt} failed").into())
        } else {
            Ok(attempt as u32)
        }
    }
}

/// Notification handler that counts how many instances were ever built.
pub struct CountedReceipt;

pub static RECEIPTS_BUILT: AtomicUsize = AtomicUsize::new(0);

impl CountedReceipt {
    pub fn build() -> Self {
        RECEIPTS_BUILT.fetch_add(1, Ordering::SeqCst);
        CountedReceipt
    }
}

impl NotificationHandler<OrderPlaced> for CountedReceipt {
    async fn handle(&self, _: &OrderPlaced, _: &CancellationToken) -> Result<(), Error> {
        Ok(())
    }
}

/// Checks the token it was handed before answering, for both a stock query
/// and an order notification.
pub struct TokenAware;

impl RequestHandler<GetStock> for TokenAware {
    async fn handle(&self, _: &GetStock, token: &CancellationToken) -> Result<u32, Error> {
        ensure_active(token)?;
        Ok(3)
    }
}

impl NotificationHandler<OrderPlaced> for TokenAware {
    async fn handle(&self, _: &OrderPlaced, token: &CancellationToken) -> Result<(), Error> {
        ensure_active(token)
    }
}
