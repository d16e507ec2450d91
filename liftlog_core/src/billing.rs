//! Subscription tier and feature gating.
//!
//! The billing service itself is an external collaborator; the core only
//! reads the current tier and asks whether a feature key is accessible.

use serde::{Deserialize, Serialize};

/// Feature keys gated behind a subscription
pub mod features {
    pub const CLOUD_SYNC: &str = "cloud_sync";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
}

impl SubscriptionTier {
    pub fn display_name(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "Free",
            SubscriptionTier::Premium => "Premium",
        }
    }

    pub fn features(&self) -> &'static [&'static str] {
        match self {
            SubscriptionTier::Free => &[
                "Basic workout tracking",
                "Exercise library",
                "Local data storage",
                "Workout history",
            ],
            SubscriptionTier::Premium => &[
                "Everything in Free",
                "Cloud sync across devices",
                "Automatic backup",
                "Data restoration",
            ],
        }
    }

    pub fn can_use_cloud_sync(&self) -> bool {
        matches!(self, SubscriptionTier::Premium)
    }
}

/// The capability surface the core consumes from the billing collaborator
#[derive(Clone, Copy, Debug, Default)]
pub struct Subscription {
    pub current_tier: SubscriptionTier,
}

impl Subscription {
    pub fn new(current_tier: SubscriptionTier) -> Self {
        Self { current_tier }
    }

    /// Whether the current tier may use a feature. Unknown keys are free.
    pub fn can_access_feature(&self, feature: &str) -> bool {
        match feature {
            features::CLOUD_SYNC => self.current_tier.can_use_cloud_sync(),
            _ => true,
        }
    }

    pub fn requires_premium(&self, feature: &str) -> bool {
        !self.can_access_feature(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tier_gates_cloud_sync() {
        let subscription = Subscription::default();
        assert!(!subscription.can_access_feature(features::CLOUD_SYNC));
        assert!(subscription.requires_premium(features::CLOUD_SYNC));
    }

    #[test]
    fn test_premium_tier_unlocks_cloud_sync() {
        let subscription = Subscription::new(SubscriptionTier::Premium);
        assert!(subscription.can_access_feature(features::CLOUD_SYNC));
        assert!(!subscription.requires_premium(features::CLOUD_SYNC));
    }

    #[test]
    fn test_unknown_features_are_free() {
        let subscription = Subscription::default();
        assert!(subscription.can_access_feature("workout_history"));
        assert!(!subscription.requires_premium("workout_history"));
    }

    #[test]
    fn test_tier_display_names() {
        assert_eq!(SubscriptionTier::Free.display_name(), "Free");
        assert_eq!(SubscriptionTier::Premium.display_name(), "Premium");
    }
}
