//! YouTube import job.

use minds_common::{AppError, AppResult};
use minds_core::VideoImport;
use serde::{Deserialize, Serialize};

/// Job to import a YouTube video into an existing video entity.
///
/// Guids travel as strings, like every other queue payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YouTubeImportJob {
    pub video_guid: String,
    pub owner_guid: String,
}

impl YouTubeImportJob {
    #[must_use]
    pub fn new(video_guid: i64, owner_guid: i64) -> Self {
        Self {
            video_guid: video_guid.to_string(),
            owner_guid: owner_guid.to_string(),
        }
    }

    /// The import request this job carries.
    pub fn import(&self) -> AppResult<VideoImport> {
        let parse = |raw: &str| {
            raw.parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("Invalid guid in YouTube import job: {raw}")))
        };

        Ok(VideoImport {
            video_guid: parse(&self.video_guid)?,
            owner_guid: parse(&self.owner_guid)?,
        })
    }
}
