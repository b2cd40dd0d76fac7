//! Job workers.

mod youtube;

pub use youtube::{
    YOUTUBE_IMPORT_CONCURRENCY, YouTubeImportContext, import_video, youtube_import_worker,
};
