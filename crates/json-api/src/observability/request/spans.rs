//! HTTP span helpers.

use uuid::Uuid;

/// Collapse identifier segments so routes have bounded cardinality in logs and metrics.
pub(super) fn route_label(path: &str) -> String {
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
        let cart = Uuid::now_v7();
        let item = Uuid::now_v7();

        assert_eq!(
            route_label(&format!("/carts/{cart}/items/{item}")),
            "/carts/{uuid}/items/{uuid}",
            "both ids collapse"
        );
    }

    #[test]
    fn static_paths_are_unchanged() {
        assert_eq!(route_label("/"), "/", "root");
        assert_eq!(route_label("/admin/carts/export"), "/admin/carts/export", "static");
    }
}
