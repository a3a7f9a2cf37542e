//! release
//!
//! Publish the generated changelog as a tagged release.
//!
//! Tags are named after the local date, `release-<day>-<month>-<year>`
//! without zero padding, so one release per day is possible.

use chrono::{Datelike, NaiveDate};

use crate::forge::{CreateReleaseRequest, Forge, ForgeError};

/// Tag name for a release created on `date`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use gen_aws_changelog::release::release_tag_for;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
/// assert_eq!(release_tag_for(date), "release-7-3-2026");
/// ```
pub fn release_tag_for(date: NaiveDate) -> String {
    format!("release-{}-{}-{}", date.day(), date.month(), date.year())
}

/// Tag name for a release created today (local time).
pub fn release_tag_today() -> String {
    release_tag_for(chrono::Local::now().date_naive())
}

/// Create a release with the changelog as its notes.
///
/// Returns the forge's confirmation (the release URL), trimmed.
///
/// # Errors
///
/// Returns the `ForgeError` from the host; the caller decides how to report
/// it.
pub async fn publish(
    forge: &dyn Forge,
    tag: &str,
    title: &str,
    changelog: &str,
) -> Result<String, ForgeError> {
    let release = forge
        .create_release(CreateReleaseRequest {
            tag: tag.to_string(),
            title: title.to_string(),
            body: changelog.to_string(),
        })
        .await?;

    Ok(release.url.trim().to_string())
}
