pub mod banner;
pub mod rotation;
pub mod slot;
pub mod social_group;
pub mod statistic;

pub use banner::Entity as BannerEntity;
pub use rotation::Entity as RotationEntity;
pub use slot::Entity as SlotEntity;
pub use social_group::Entity as SocialGroupEntity;
pub use statistic::Entity as StatisticEntity;
