//! # Fetch Sources
//!
//! A [`Source`] resolves one [`RequestId`] to a value, suspending the caller
//! until the value is ready. It models a remote call: the sequencer only ever
//! talks to sources, and every composition strategy is built from repeated
//! `fetch` calls.
//!
//! Callback, promise and async/await styles of the same call are all covered
//! by this single contract. A source never blocks the executor; it yields at
//! explicit await points and lets sibling fetches interleave.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Source`] uses native `async fn` for zero-cost static dispatch. Use
//! [`DynSource`] when sources of different types have to live in one
//! collection.

use crate::{error::FetchError, request::RequestId, request::Value};
use std::{future::Future, pin::Pin};

/// Something that can resolve a request to a value.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a fetch `Source`",
    label = "missing `Source` implementation",
    note = "Sources must implement `fetch`, resolving a `RequestId` to `Self::Output`."
)]
pub trait Source: Send + Sync + 'static {
    /// The value a successful fetch yields.
    type Output: Value;

    /// Resolve `id`, suspending until the value is available.
    fn fetch(
        &self,
        id: &RequestId,
    ) -> impl Future<Output = Result<Self::Output, FetchError>> + Send;

    /// Resolve `id` as one stage of a chain, given the values the previous
    /// stage handed down. `upstream` is empty when that stage failed.
    ///
    /// The default ignores `upstream` and calls [`fetch`](Source::fetch).
    fn fetch_stage(
        &self,
        id: &RequestId,
        upstream: &[Self::Output],
    ) -> impl Future<Output = Result<Self::Output, FetchError>> + Send {
        let _ = upstream;
        self.fetch(id)
    }
}

/// Dynamic object-safe version of [`Source`].
pub trait DynSource: Send + Sync + 'static {
    /// The value a successful fetch yields.
    type Output: Value;

    /// Resolve `id` (dynamic dispatch version).
    fn fetch_dyn<'a>(
        &'a self,
        id: &'a RequestId,
    ) -> BoxFetch<'a, Self::Output>;

    /// Resolve `id` as a chain stage (dynamic dispatch version).
    fn fetch_stage_dyn<'a>(
        &'a self,
        id: &'a RequestId,
        upstream: &'a [Self::Output],
    ) -> BoxFetch<'a, Self::Output>;
}

/// The boxed future returned by [`DynSource`] methods.
pub type BoxFetch<'a, V> = Pin<Box<dyn Future<Output = Result<V, FetchError>> + Send + 'a>>;

// Any Source is usable as a DynSource.
impl<S: Source> DynSource for S {
    type Output = S::Output;

    fn fetch_dyn<'a>(&'a self, id: &'a RequestId) -> BoxFetch<'a, Self::Output> {
        Box::pin(self.fetch(id))
    }

    fn fetch_stage_dyn<'a>(
        &'a self,
        id: &'a RequestId,
        upstream: &'a [Self::Output],
    ) -> BoxFetch<'a, Self::Output> {
        Box::pin(self.fetch_stage(id, upstream))
    }
}

/// A type-erased source.
pub type BoxSource<V> = Box<dyn DynSource<Output = V>>;

// Dispatch through the trait object. `self.fetch_dyn` would resolve to the
// box's own blanket `DynSource` impl and recurse back into this one.
impl<V: Value> Source for BoxSource<V> {
    type Output = V;

    async fn fetch(&self, id: &RequestId) -> Result<V, FetchError> {
        (**self).fetch_dyn(id).await
    }

    async fn fetch_stage(&self, id: &RequestId, upstream: &[V]) -> Result<V, FetchError> {
        (**self).fetch_stage_dyn(id, upstream).await
    }
}

impl<S: Source> Source for std::sync::Arc<S> {
    type Output = S::Output;

    fn fetch(
        &self,
        id: &RequestId,
    ) -> impl Future<Output = Result<Self::Output, FetchError>> + Send {
        S::fetch(self, id)
    }

    fn fetch_stage(
        &self,
        id: &RequestId,
        upstream: &[Self::Output],
    ) -> impl Future<Output = Result<Self::Output, FetchError>> + Send {
        S::fetch_stage(self, id, upstream)
    }
}
