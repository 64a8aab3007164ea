//! Object keys for rendered assets.

use chrono::{DateTime, Utc};

use reel_models::VideoStyle;

use crate::error::{StorageError, StorageResult};

/// Content type of rendered videos (h264 in mp4).
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Key for a rendered video.
///
/// Format: `{business_id}/{style}/{timestamp_ms}.mp4`
pub fn video_asset_key(
    business_id: &str,
    style: VideoStyle,
    rendered_at: DateTime<Utc>,
) -> StorageResult<String> {
    validate_segment(business_id)?;
    Ok(format!(
        "{}/{}/{}.mp4",
        business_id,
        style.as_str(),
        rendered_at.timestamp_millis()
    ))
}

fn validate_segment(segment: &str) -> StorageResult<()> {
    if segment.is_empty() {
        return Err(StorageError::invalid_key("business id is empty"));
    }
    if segment == "." || segment == ".." {
        return Err(StorageError::invalid_key(format!("'{}' is not a valid path segment", segment)));
    }
    if !segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(StorageError::invalid_key(format!(
            "business id '{}' contains unsupported characters",
            segment
        )));
    }
    Ok(())
}
