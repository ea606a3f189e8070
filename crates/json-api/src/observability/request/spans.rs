//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_collapsed() {
        let names = request_span_name(
            "GET",
            "/customers/01890a5d-ac96-774b-bcce-b302099a8057/selections",
        );

        assert_eq!(names.otel_path, "/customers/{uuid}/selections");
        assert_eq!(names.otel_span_name, "GET /customers/{uuid}/selections");
    }

    #[test]
    fn plain_paths_are_unchanged() {
        assert_eq!(
            request_span_name("POST", "/slots/check-and-reserve").otel_path,
            "/slots/check-and-reserve"
        );
        assert_eq!(request_span_name("GET", "/").otel_path, "/");
    }
}
