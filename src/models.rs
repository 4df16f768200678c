use crate::stats::Summary;
use serde::{Deserialize, Serialize};

/// One recorded word. `date` is always the UTC calendar day of `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub word: String,
    pub timestamp: i64,
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddEntryRequest {
    #[serde(default)]
    pub word: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsernameResponse {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct AddEntryResponse {
    pub entry: Entry,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SharedBoardResponse {
    pub entries: Vec<Entry>,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
