//! Wire types exchanged with the websh API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of image slots carried by every request and response.
pub const IMAGE_SLOTS: usize = 4;

/// Body of `GET /api/ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResult {
    pub status: String,
}

impl PingResult {
    /// Whether the server reported itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Body of `POST /api/shellgei`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub code: String,
    /// Base64-encoded images made available to the remote command.
    pub images: [String; IMAGE_SLOTS],
}

impl ExecuteRequest {
    /// Creates a request for `code` with all image slots empty.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            images: Default::default(),
        }
    }
}

/// Response of `POST /api/shellgei`.
///
/// Missing fields decode to their defaults so that a partial reply can
/// still be rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionResult {
    /// Exit status of the remote command.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    /// Base64-encoded images produced by the command; empty strings are unused slots.
    #[serde(deserialize_with = "image_slots")]
    pub images: [String; IMAGE_SLOTS],
    /// Pre-formatted duration, display only.
    pub elapsed_time: String,
}

/// Reads `images` leniently: `null` or a short array leaves the remaining
/// slots empty, and entries past the last slot are dropped.
fn image_slots<'de, D>(deserializer: D) -> Result<[String; IMAGE_SLOTS], D::Error>
where
    D: Deserializer<'de>,
{
    let received: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    let mut images: [String; IMAGE_SLOTS] = Default::default();
    for (slot, data) in images.iter_mut().zip(received.into_iter().flatten()) {
        *slot = data.unwrap_or_default();
    }
    Ok(images)
}

impl ExecutionResult {
    /// Decodes every non-empty image slot, yielding `(slot, bytes)`.
    pub fn attached_images(
        &self,
    ) -> impl Iterator<Item = (usize, Result<Vec<u8>, base64::DecodeError>)> + '_ {
        self.images
            .iter()
            .enumerate()
            .filter(|(_, data)| !data.is_empty())
            .map(|(slot, data)| (slot, BASE64_STANDARD.decode(data)))
    }
}
