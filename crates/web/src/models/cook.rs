//! Cook profile domain types.

use chrono::{DateTime, Utc};

use homeplate_core::{CookId, CookStatus, UserId};

/// A home cook's profile (domain type).
///
/// Existence of this row is what makes a user resolve to the cook role.
/// The status only gates selling: pending and suspended cooks keep their
/// dashboard but cannot publish dishes or work orders.
#[derive(Debug, Clone)]
pub struct CookProfile {
    /// Unique cook profile ID.
    pub id: CookId,
    /// The user this profile belongs to. One profile per user.
    pub user_id: UserId,
    /// Public kitchen name (e.g., "Asha's Kitchen").
    pub kitchen_name: String,
    /// Short bio shown on dish pages.
    pub bio: String,
    /// Campus area the cook delivers to.
    pub campus_area: String,
    /// Approval status.
    pub status: CookStatus,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl CookProfile {
    /// Whether this cook may publish dishes and work orders.
    #[must_use]
    pub fn can_sell(&self) -> bool {
        self.status == CookStatus::Approved
    }
}
