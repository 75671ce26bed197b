//! Wire contract between the launcher and the privileged browser side.
//!
//! Requests are JSON objects tagged by `"type"`. Searches answer with
//! `{"items": [...]}`; actions answer with an acknowledgement. Over the
//! stdio bridge each request travels inside a [`RequestEnvelope`] and each
//! answer inside a [`ResponseEnvelope`].

use serde::{Deserialize, Serialize};

/// Contract version for request/response envelopes.
pub const CONTRACT_VERSION: u32 = 1;

/// A request from the launcher to the platform side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostRequest {
    #[serde(rename = "SEARCH_HISTORY")]
    SearchHistory { query: String },
    #[serde(rename = "SEARCH_TABS")]
    SearchTabs { query: String },
    #[serde(rename = "SEARCH_BOOKMARKS")]
    SearchBookmarks { query: String },
    #[serde(rename = "OPEN_TAB")]
    OpenTab { url: String },
    #[serde(rename = "SWITCH_TO_TAB")]
    SwitchToTab {
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
}

/// The `"type"` tag of a [`HostRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    SearchHistory,
    SearchTabs,
    SearchBookmarks,
    OpenTab,
    SwitchToTab,
}

impl RequestKind {
    /// Render the kind to its wire tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SearchHistory => "SEARCH_HISTORY",
            Self::SearchTabs => "SEARCH_TABS",
            Self::SearchBookmarks => "SEARCH_BOOKMARKS",
            Self::OpenTab => "OPEN_TAB",
            Self::SwitchToTab => "SWITCH_TO_TAB",
        }
    }

    /// Parse a wire tag.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "SEARCH_HISTORY" => Some(Self::SearchHistory),
            "SEARCH_TABS" => Some(Self::SearchTabs),
            "SEARCH_BOOKMARKS" => Some(Self::SearchBookmarks),
            "OPEN_TAB" => Some(Self::OpenTab),
            "SWITCH_TO_TAB" => Some(Self::SwitchToTab),
            _ => None,
        }
    }

    /// Whether requests of this kind answer with `{"items": [...]}`.
    #[must_use]
    pub fn is_search(self) -> bool {
        matches!(
            self,
            Self::SearchHistory | Self::SearchTabs | Self::SearchBookmarks
        )
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HostRequest {
    #[must_use]
    pub fn search_history(query: impl Into<String>) -> Self {
        Self::SearchHistory {
            query: query.into(),
        }
    }

    #[must_use]
    pub fn search_tabs(query: impl Into<String>) -> Self {
        Self::SearchTabs {
            query: query.into(),
        }
    }

    #[must_use]
    pub fn search_bookmarks(query: impl Into<String>) -> Self {
        Self::SearchBookmarks {
            query: query.into(),
        }
    }

    #[must_use]
    pub fn open_tab(url: impl Into<String>) -> Self {
        Self::OpenTab { url: url.into() }
    }

    #[must_use]
    pub fn switch_to_tab(tab_id: i64) -> Self {
        Self::SwitchToTab { tab_id }
    }

    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::SearchHistory { .. } => RequestKind::SearchHistory,
            Self::SearchTabs { .. } => RequestKind::SearchTabs,
            Self::SearchBookmarks { .. } => RequestKind::SearchBookmarks,
            Self::OpenTab { .. } => RequestKind::OpenTab,
            Self::SwitchToTab { .. } => RequestKind::SwitchToTab,
        }
    }

    #[must_use]
    pub fn is_search_history(&self) -> bool {
        matches!(self, Self::SearchHistory { .. })
    }

    #[must_use]
    pub fn is_search_tabs(&self) -> bool {
        matches!(self, Self::SearchTabs { .. })
    }

    #[must_use]
    pub fn is_search_bookmarks(&self) -> bool {
        matches!(self, Self::SearchBookmarks { .. })
    }

    #[must_use]
    pub fn is_open_tab(&self) -> bool {
        matches!(self, Self::OpenTab { .. })
    }

    #[must_use]
    pub fn is_switch_to_tab(&self) -> bool {
        matches!(self, Self::SwitchToTab { .. })
    }
}

/// Payload of every search answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItems<T> {
    pub items: Vec<T>,
}

impl<T> SearchItems<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }
}

/// Payload of every action answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub accepted: bool,
}

impl Ack {
    #[must_use]
    pub fn accepted() -> Self {
        Self { accepted: true }
    }
}

/// A versioned request envelope from launcher -> platform side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub v: u32,
    pub request_id: String,
    #[serde(flatten)]
    pub request: HostRequest,
}

impl RequestEnvelope {
    /// Build a v1 request envelope.
    #[must_use]
    pub fn new(request_id: impl Into<String>, request: HostRequest) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            request,
        }
    }

    /// Validate envelope version and required identifiers.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.v != CONTRACT_VERSION {
            return Err(ContractError::new(
                ContractErrorKind::UnsupportedVersion,
                format!(
                    "unsupported contract version {}; expected {}",
                    self.v, CONTRACT_VERSION
                ),
            ));
        }
        if self.request_id.trim().is_empty() {
            return Err(ContractError::new(
                ContractErrorKind::InvalidEnvelope,
                "request_id cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A versioned response envelope from platform side -> launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub v: u32,
    pub request_id: String,
    pub ok: bool,
    pub payload: serde_json::Value,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Build a successful response envelope.
    #[must_use]
    pub fn ok(request_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            ok: true,
            payload,
            error: None,
        }
    }

    /// Build an error response envelope.
    #[must_use]
    pub fn error(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            ok: false,
            payload: serde_json::Value::Null,
            error: Some(message.into()),
        }
    }
}

/// Contract validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractErrorKind {
    UnsupportedVersion,
    InvalidEnvelope,
}

/// Contract validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    pub kind: ContractErrorKind,
    pub message: String,
}

impl ContractError {
    #[must_use]
    pub fn new(kind: ContractErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ContractError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_are_tagged_by_type() {
        let value = serde_json::to_value(HostRequest::search_tabs("docs")).expect("serialize");
        assert_eq!(value, json!({"type": "SEARCH_TABS", "query": "docs"}));

        let value = serde_json::to_value(HostRequest::switch_to_tab(12)).expect("serialize");
        assert_eq!(value, json!({"type": "SWITCH_TO_TAB", "tabId": 12}));
    }

    #[test]
    fn parses_wire_requests() {
        let request: HostRequest =
            serde_json::from_value(json!({"type": "OPEN_TAB", "url": "https://a.com"}))
                .expect("deserialize");
        assert_eq!(request, HostRequest::open_tab("https://a.com"));
        assert!(request.is_open_tab());
        assert!(!request.is_switch_to_tab());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<HostRequest, _> =
            serde_json::from_value(json!({"type": "CLOSE_TAB", "tabId": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn kind_predicates_match_constructors() {
        assert!(HostRequest::search_history("q").is_search_history());
        assert!(HostRequest::search_tabs("q").is_search_tabs());
        assert!(HostRequest::search_bookmarks("q").is_search_bookmarks());
        assert!(HostRequest::open_tab("u").is_open_tab());
        assert!(HostRequest::switch_to_tab(1).is_switch_to_tab());
        assert!(!HostRequest::search_tabs("q").is_search_history());
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in [
            RequestKind::SearchHistory,
            RequestKind::SearchTabs,
            RequestKind::SearchBookmarks,
            RequestKind::OpenTab,
            RequestKind::SwitchToTab,
        ] {
            assert_eq!(RequestKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RequestKind::parse("search_tabs"), None);
        assert!(RequestKind::SearchBookmarks.is_search());
        assert!(!RequestKind::OpenTab.is_search());
        assert_eq!(HostRequest::open_tab("u").kind().to_string(), "OPEN_TAB");
    }

    #[test]
    fn envelope_flattens_request() {
        let envelope = RequestEnvelope::new("req-1", HostRequest::search_bookmarks("rust"));
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(
            value,
            json!({"v": 1, "request_id": "req-1", "type": "SEARCH_BOOKMARKS", "query": "rust"})
        );
        let parsed: RequestEnvelope = serde_json::from_value(value).expect("deserialize");
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn envelope_validation() {
        let mut envelope = RequestEnvelope::new("req-1", HostRequest::open_tab("u"));
        assert!(envelope.validate().is_ok());

        envelope.v = 9;
        let err = envelope.validate().unwrap_err();
        assert_eq!(err.kind, ContractErrorKind::UnsupportedVersion);

        envelope.v = CONTRACT_VERSION;
        envelope.request_id = "  ".into();
        let err = envelope.validate().unwrap_err();
        assert_eq!(err.kind, ContractErrorKind::InvalidEnvelope);
    }

    #[test]
    fn payload_shapes() {
        let items = SearchItems::new(vec![json!({"id": 1})]);
        assert_eq!(serde_json::to_value(&items).expect("serialize"), json!({"items": [{"id": 1}]}));
        assert_eq!(
            serde_json::to_value(Ack::accepted()).expect("serialize"),
            json!({"accepted": true})
        );
        let empty: SearchItems<serde_json::Value> = SearchItems::empty();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn error_response_is_well_formed() {
        let resp = ResponseEnvelope::error("parse-error", "bad json");
        assert!(!resp.ok);
        assert_eq!(resp.request_id, "parse-error");
        assert_eq!(resp.v, CONTRACT_VERSION);
        assert_eq!(resp.payload, serde_json::Value::Null);
        assert!(resp.error.is_some());
    }
}
