//! Evidence Upload Client
//!
//! Packages a finalized [`Artifact`] for transmission. Retries are never
//! automatic: an ambiguous network failure may already have stored the
//! file, so resubmission is left to the caregiver.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sprout_common::time::epoch_millis;
use sprout_common::MilestoneId;

use crate::capture::{Artifact, DEFAULT_CONTENT_TYPE};
use crate::error::UploadError;

/// Extension used for anything not declared as webm
pub const FALLBACK_EXTENSION: &str = "mp4";

/// Destination for finalized evidence
#[async_trait]
pub trait EvidenceTransport: Send + Sync {
    async fn upload(&self, milestone_id: MilestoneId, artifact: &Artifact) -> Result<(), UploadError>;
}

/// File extension for a declared content type
///
/// Only webm keeps its own container extension. Everything else (including
/// `video/quicktime` from devices that cannot produce webm) is named `.mp4`
/// so native players on those devices open it.
pub fn extension_for(content_type: &str) -> &'static str {
    if content_type.to_ascii_lowercase().contains("webm") {
        "webm"
    } else {
        FALLBACK_EXTENSION
    }
}

/// Generated upload file name: `evidence_<milestone>_<capture millis>.<ext>`
pub fn evidence_file_name(
    milestone_id: MilestoneId,
    content_type: &str,
    captured_at: DateTime<Utc>,
) -> String {
    format!(
        "evidence_{}_{}.{}",
        milestone_id,
        epoch_millis(captured_at),
        extension_for(content_type)
    )
}

/// Content type for a recording file on disk, by extension
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp4" | "m4v" => "video/mp4",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Multipart-ready payload built from an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidencePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl EvidencePayload {
    pub fn new(milestone_id: MilestoneId, artifact: &Artifact) -> Self {
        Self {
            file_name: evidence_file_name(
                milestone_id,
                artifact.content_type(),
                artifact.captured_at(),
            ),
            content_type: artifact.content_type().to_string(),
            bytes: artifact.data().to_vec(),
        }
    }

    /// Content type with any parameters (`;codecs=...`) removed
    pub fn essence(&self) -> &str {
        self.content_type
            .split(';')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_quicktime_uses_fallback_extension() {
        let name = evidence_file_name(MilestoneId(7), "video/quicktime", at(1_700_000_000_123));
        assert_eq!(name, "evidence_7_1700000000123.mp4");
    }

    #[test]
    fn test_webm_keeps_extension() {
        assert_eq!(extension_for("video/webm"), "webm");
        assert_eq!(extension_for("video/webm;codecs=vp9,opus"), "webm");
        assert_eq!(extension_for("VIDEO/WEBM"), "webm");
        assert_eq!(extension_for("video/mp4"), "mp4");
        assert_eq!(extension_for(""), "mp4");
    }

    #[test]
    fn test_content_type_for_extension() {
        assert_eq!(content_type_for_extension("webm"), "video/webm");
        assert_eq!(content_type_for_extension("MOV"), "video/quicktime");
        assert_eq!(content_type_for_extension("mp4"), "video/mp4");
        assert_eq!(content_type_for_extension("avi"), "video/mp4");
    }

    #[test]
    fn test_payload_from_artifact() {
        let artifact = Artifact::from_bytes(vec![9; 4], "video/webm;codecs=vp8", at(42));
        let payload = EvidencePayload::new(MilestoneId(3), &artifact);

        assert_eq!(payload.file_name, "evidence_3_42.webm");
        assert_eq!(payload.content_type, "video/webm;codecs=vp8");
        assert_eq!(payload.essence(), "video/webm");
        assert_eq!(payload.bytes, vec![9; 4]);
    }
}
