//! Database entities.

pub mod entity;
pub mod group;
pub mod group_member;
pub mod subscription;
pub mod user;
pub mod vote;

pub use entity::Entity as ContentEntity;
pub use group::Entity as Group;
pub use group_member::Entity as GroupMember;
pub use subscription::Entity as Subscription;
pub use user::Entity as User;
pub use vote::Entity as Vote;
