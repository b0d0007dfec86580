pub mod catalog;
pub mod insight;
pub mod usage;

pub use catalog::{
  CatalogSpec, DaytimeAdjustment, FacilityProfile, FacilitySpec, FacilityType, MembershipTier,
  OperatingHours, TierSpec,
};
pub use insight::{Insight, InsightCategory, InsightKind, Priority};
pub use usage::{DayCategory, TimeCategory, UsageRecord};
