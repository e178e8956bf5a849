//! Request/response protocol between the orchestrator and the search worker.
//!
//! Every request carries the caller's trace context so the worker span is a
//! child of the span that issued it, even though the request completes on a
//! later turn of the event loop. Search requests also carry the
//! [`RequestToken`] that the orchestrator uses to fence out stale responses.

use crate::client::SearchPayload;
use crate::domain::{CanonicalMovieDetails, CanonicalMovieSummary, RawMovieRecord, ReelsearchError};
use serde::{Deserialize, Serialize};

/// Monotonically increasing identifier of an issued search request.
///
/// Only the response whose token equals the pending token is applied.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RequestToken(pub u64);

impl RequestToken {
    /// The token following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// OpenTelemetry identifiers of the span that issued a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// Trace ID as 32 hex characters.
    pub trace_id: String,

    /// Issuing span ID as 16 hex characters.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span
    /// context is otherwise invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsearch::worker::TraceContext;
    ///
    /// // Without a subscriber there is no valid span context.
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        let context = Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        };
        tracing::trace!(
            trace_id = %context.trace_id,
            parent_span_id = %context.parent_span_id,
            "captured trace context"
        );
        Some(context)
    }

    /// Rebuilds a remote parent context from the captured IDs.
    ///
    /// Returns `None` if either ID is not valid hex.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;
        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    search(Search { token: RequestToken, query: String, page: u32 }),
    load_details(LoadDetails { imdb_id: String }),
    load_popular(LoadPopular {}),
}

/// Requests executed by the [`SearchWorker`](super::SearchWorker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Run a remote search.
    Search {
        /// Fencing token assigned by the orchestrator.
        token: RequestToken,

        /// Trimmed query text.
        query: String,

        /// Page requested from the service.
        page: u32,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch the full record for one title.
    LoadDetails {
        imdb_id: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch the popular-titles list.
    LoadPopular {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context captured when the message was built.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Search { trace_context, .. }
            | Self::LoadDetails { trace_context, .. }
            | Self::LoadPopular { trace_context } => trace_context.as_ref(),
        }
    }

    /// Short name for span fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::LoadDetails { .. } => "load_details",
            Self::LoadPopular { .. } => "load_popular",
        }
    }
}

/// How a search request ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// The service returned a result set.
    Found {
        results: Vec<RawMovieRecord>,
        total_count: u64,
    },

    /// The service answered but reported no match or an error.
    Rejected { message: String },

    /// No usable answer: network failure, bad status, or unreadable body.
    Failed { message: String },
}

impl SearchOutcome {
    /// Classifies a decoded payload by its success flag.
    #[must_use]
    pub fn from_payload(payload: SearchPayload) -> Self {
        if payload.success {
            Self::Found {
                total_count: payload.total_results,
                results: payload.results,
            }
        } else {
            Self::Rejected {
                message: payload.error_message(),
            }
        }
    }

    /// Wraps a transport-level error.
    #[must_use]
    pub fn from_error(error: &ReelsearchError) -> Self {
        Self::Failed {
            message: error.user_message(),
        }
    }
}

/// Responses produced by the worker, routed back to the orchestrator as events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A search request finished, successfully or not.
    SearchCompleted {
        token: RequestToken,
        query: String,
        outcome: SearchOutcome,
    },

    /// A detail lookup succeeded.
    DetailsLoaded {
        imdb_id: String,
        details: CanonicalMovieDetails,
    },

    /// The popular-titles list arrived, normalized in service order.
    PopularLoaded { movies: Vec<CanonicalMovieSummary> },

    /// A non-search request failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase() {
        let first = RequestToken(0);
        assert!(first.next() > first);
        assert_eq!(first.next().next(), RequestToken(2));
        assert_eq!(RequestToken(u64::MAX).next(), RequestToken(u64::MAX));
    }

    #[test]
    fn builders_leave_trace_context_empty_without_subscriber() {
        let message = WorkerMessage::search(RequestToken(3), "alien".to_string(), 1);
        assert!(message.trace_context().is_none());
        assert_eq!(message.kind(), "search");

        let popular = WorkerMessage::load_popular();
        assert!(matches!(popular, WorkerMessage::LoadPopular { trace_context: None }));
        assert_eq!(popular.kind(), "load_popular");
    }

    #[test]
    fn trace_context_round_trips_through_otel() {
        use opentelemetry::trace::TraceContextExt;

        let context = TraceContext {
            trace_id: "4bf92f3577b34da6a3ce929d0e0e4736".to_string(),
            parent_span_id: "00f067aa0ba902b7".to_string(),
        };
        let otel = context.to_otel_context().expect("valid ids");
        let span_ref = otel.span();
        let span_context = span_ref.span_context();
        assert!(span_context.is_remote());
        assert_eq!(format!("{:016x}", span_context.span_id()), context.parent_span_id);

        let bad = TraceContext {
            trace_id: "zz".to_string(),
            parent_span_id: "00f067aa0ba902b7".to_string(),
        };
        assert!(bad.to_otel_context().is_none());
    }

    #[test]
    fn payload_classification() {
        let found = SearchOutcome::from_payload(SearchPayload {
            success: true,
            results: vec![RawMovieRecord::from_pairs([("Title", "Up")])],
            total_results: 9,
            error: None,
        });
        assert!(matches!(found, SearchOutcome::Found { total_count: 9, ref results } if results.len() == 1));

        let rejected = SearchOutcome::from_payload(SearchPayload {
            success: false,
            error: Some("Too many results.".to_string()),
            ..SearchPayload::default()
        });
        assert_eq!(
            rejected,
            SearchOutcome::Rejected {
                message: "Too many results.".to_string()
            }
        );
    }

    #[test]
    fn transport_errors_become_failures() {
        let outcome = SearchOutcome::from_error(&ReelsearchError::Transport(
            "Request timed out".to_string(),
        ));
        assert_eq!(
            outcome,
            SearchOutcome::Failed {
                message: "Request timed out".to_string()
            }
        );
    }
}
