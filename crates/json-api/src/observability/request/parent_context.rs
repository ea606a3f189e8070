//! Joining a trace the booking site started.
//!
//! Only the W3C `traceparent` and `tracestate` headers are read; a request without a valid
//! `traceparent` starts a new trace.

use opentelemetry::{
    Context,
    propagation::{Extractor, TextMapPropagator as _},
    trace::TraceContextExt as _,
};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use salvo::http::HeaderMap;

const TRACEPARENT: &str = "traceparent";
const TRACESTATE: &str = "tracestate";

/// The W3C trace headers of a request.
#[derive(Debug)]
struct TraceHeaders<'a> {
    traceparent: Option<&'a str>,
    tracestate: Option<&'a str>,
}

impl<'a> TraceHeaders<'a> {
    fn from_headers(headers: &'a HeaderMap) -> Self {
        Self {
            traceparent: header(headers, TRACEPARENT),
            tracestate: header(headers, TRACESTATE),
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

impl Extractor for TraceHeaders<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        if key.eq_ignore_ascii_case(TRACEPARENT) {
            self.traceparent
        } else if key.eq_ignore_ascii_case(TRACESTATE) {
            self.tracestate
        } else {
            None
        }
    }

    fn keys(&self) -> Vec<&str> {
        [
            self.traceparent.map(|_| TRACEPARENT),
            self.tracestate.map(|_| TRACESTATE),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Remote parent named by the request's `traceparent` header, if it is valid.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    let headers = TraceHeaders::from_headers(headers);
    let context = TraceContextPropagator::new().extract_with_context(&Context::new(), &headers);
    let is_valid = context.span().span_context().is_valid();

    is_valid.then_some(context)
}

#[cfg(test)]
mod tests {
    use salvo::http::HeaderValue;

    use super::*;

    const PARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();

        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }

        headers
    }

    #[test]
    fn valid_traceparent_becomes_the_remote_parent() {
        let context = extract_parent_context(&headers(&[
            ("traceparent", PARENT),
            ("tracestate", "cinemates=checkout"),
        ]));

        let trace_id = context.map(|context| context.span().span_context().trace_id().to_string());

        assert_eq!(
            trace_id.as_deref(),
            Some("4bf92f3577b34da6a3ce929d0e0e4736")
        );
    }

    #[test]
    fn malformed_or_missing_traceparent_starts_a_new_trace() {
        assert!(extract_parent_context(&headers(&[])).is_none());
        assert!(extract_parent_context(&headers(&[("traceparent", "00-zz-01")])).is_none());
        assert!(
            extract_parent_context(&headers(&[("tracestate", "cinemates=checkout")])).is_none()
        );
    }

    #[test]
    fn unrelated_headers_are_not_exposed() {
        let map = headers(&[("traceparent", PARENT), ("x-request-id", "req-42")]);
        let trace_headers = TraceHeaders::from_headers(&map);

        assert_eq!(trace_headers.keys(), vec![TRACEPARENT]);
        assert_eq!(trace_headers.get("x-request-id"), None);
        assert_eq!(trace_headers.get("Traceparent"), Some(PARENT));
    }
}
