//! Repositories wrapping sea-orm queries.

mod entity;
mod group;
mod subscription;
mod user;
mod vote;

pub use entity::EntityRepository;
pub use group::GroupRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;
