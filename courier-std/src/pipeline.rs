//! Pipeline composition.
//!
//! Builds the nested continuation that runs a request's behaviors around its
//! handler. The first registered behavior ends up outermost: it runs first
//! and finishes last.

use courier_core::{CancellationToken, DynPipelineBehavior, DynRequestHandler, Next, Request};
use std::sync::Arc;

/// Compose `behaviors` (registration order) around `handler`.
///
/// Starts from a continuation that invokes the handler and wraps it once per
/// behavior, walking the list backwards, so the last wrap is the
/// first-registered behavior. The returned [`Next`] may be run any number of
/// times; each run starts a fresh pass through the chain.
pub fn compose<'a, R: Request>(
    request: &'a R,
    handler: &'a dyn DynRequestHandler<R>,
    behaviors: &'a [Arc<dyn DynPipelineBehavior<R>>],
    token: &'a CancellationToken,
) -> Next<'a, R::Response> {
    let terminal = Next::new(move || handler.handle_dyn(request, token));

    behaviors.iter().rev().fold(terminal, |inner, behavior| {
        Next::new(move || behavior.handle_dyn(request, inner.clone(), token))
    })
}
