//! Job definitions.

#![allow(missing_docs)]

mod email;
mod youtube;

pub use email::{ConfirmationEmailJob, WelcomeEmailJob};
pub use youtube::YouTubeImportJob;
