/// Response envelopes shared by every API endpoint
///
/// The backend wraps every payload in `{ message, response }`, with list
/// endpoints adding an optional `pagination` block. These wrappers are the
/// only response shapes the domain services ever decode.
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::envelope::ListResponse;
///
/// let body = r#"{
///     "message": "Boards fetched",
///     "response": [],
///     "pagination": { "page": 1, "pages": 1, "count": 0, "perPage": 20 }
/// }"#;
/// let parsed: ListResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
/// assert_eq!(parsed.pagination.unwrap().page, 1);
/// ```

use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-based)
    pub page: u32,

    /// Total number of pages
    pub pages: u32,

    /// Total number of matching records
    pub count: u64,

    /// Records per page
    pub per_page: u32,
}

/// Envelope for list endpoints: `{ message, response: T[], pagination? }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Human-readable status message from the server
    pub message: String,

    /// The returned collection
    pub response: Vec<T>,

    /// Pagination metadata, when the endpoint paginates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Envelope for single-entity endpoints: `{ message, response: T }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityResponse<T> {
    /// Human-readable status message from the server
    pub message: String,

    /// The returned entity
    pub response: T,
}

/// Envelope for endpoints that return only a confirmation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable status message from the server
    pub message: String,
}
