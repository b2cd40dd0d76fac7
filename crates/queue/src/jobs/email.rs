//! Email jobs. Delivery happens in the mailer that consumes these queues.

use serde::{Deserialize, Serialize};

/// Job to send the email confirmation link to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationEmailJob {
    pub user_guid: String,
}

/// Job to send the welcome email once a user is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeEmailJob {
    pub user_guid: String,
}
