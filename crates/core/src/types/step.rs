//! Checkout step enum.

use serde::{Deserialize, Serialize};

/// A step of the linear checkout flow.
///
/// Steps are ordered: `Shipping < Payment < Confirmation`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    /// All steps in flow order.
    pub const ALL: [Self; 3] = [Self::Shipping, Self::Payment, Self::Confirmation];

    /// Zero-based position in the flow.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Shipping => 0,
            Self::Payment => 1,
            Self::Confirmation => 2,
        }
    }

    /// Label shown in the step indicator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::Confirmation => "Confirm",
        }
    }

    /// How `step` should be drawn when the flow is currently at `self`.
    #[must_use]
    pub fn progress_of(self, step: Self) -> StepProgress {
        match step.cmp(&self) {
            core::cmp::Ordering::Less => StepProgress::Complete,
            core::cmp::Ordering::Equal => StepProgress::Current,
            core::cmp::Ordering::Greater => StepProgress::Upcoming,
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shipping => write!(f, "shipping"),
            Self::Payment => write!(f, "payment"),
            Self::Confirmation => write!(f, "confirmation"),
        }
    }
}

impl std::str::FromStr for CheckoutStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shipping" => Ok(Self::Shipping),
            "payment" => Ok(Self::Payment),
            "confirmation" => Ok(Self::Confirmation),
            _ => Err(format!("invalid checkout step: {s}")),
        }
    }
}

/// Display state of one step in the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepProgress {
    Complete,
    Current,
    Upcoming,
}
