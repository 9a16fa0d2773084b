//! Upstream query convention shared by all providers.
//!
//! Every provider exposes one GET endpoint driven by query parameters:
//! `ac` (action), `pg` (page), `wd` (keyword), `ids` (comma-joined ids),
//! `h` (recency window in hours) and `out=json` to force JSON output.

/// One logical request to a provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderQuery {
    /// First listing page, used only to measure reachability.
    Probe,
    /// First page of recently updated items.
    Recent {
        /// Recency window in hours
        hours: u32,
    },
    /// Keyword search.
    Search {
        /// Free-text keyword, encoded when the URL is built
        keyword: String,
    },
    /// Detail lookup for one or more item ids.
    Detail {
        /// Provider-specific item ids
        ids: Vec<String>,
    },
}

impl ProviderQuery {
    /// Query parameters for this request, in wire order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            ProviderQuery::Probe => vec![("ac", "list".to_string()), ("pg", "1".to_string())],
            ProviderQuery::Recent { hours } => vec![
                ("ac", "list".to_string()),
                ("pg", "1".to_string()),
                ("h", hours.to_string()),
                ("out", "json".to_string()),
            ],
            ProviderQuery::Search { keyword } => vec![
                ("ac", "list".to_string()),
                ("wd", keyword.clone()),
                ("out", "json".to_string()),
            ],
            ProviderQuery::Detail { ids } => vec![
                ("ac", "detail".to_string()),
                ("ids", ids.join(",")),
                ("out", "json".to_string()),
            ],
        }
    }

    /// Short label used in log fields.
    pub fn action(&self) -> &'static str {
        match self {
            ProviderQuery::Probe => "probe",
            ProviderQuery::Recent { .. } => "recent",
            ProviderQuery::Search { .. } => "search",
            ProviderQuery::Detail { .. } => "detail",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_params_request_first_page_without_json() {
        assert_eq!(
            ProviderQuery::Probe.params(),
            vec![("ac", "list".to_string()), ("pg", "1".to_string())]
        );
    }

    #[test]
    fn test_recent_params_carry_window() {
        let params = ProviderQuery::Recent { hours: 24 }.params();
        assert!(params.contains(&("h", "24".to_string())));
        assert!(params.contains(&("out", "json".to_string())));
    }

    #[test]
    fn test_detail_ids_are_comma_joined() {
        let params = ProviderQuery::Detail {
            ids: vec!["12".to_string(), "34".to_string()],
        }
        .params();
        assert_eq!(params[0], ("ac", "detail".to_string()));
        assert_eq!(params[1], ("ids", "12,34".to_string()));
    }
}
