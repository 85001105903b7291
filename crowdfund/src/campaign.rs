//! Campaign state as read from the crowdfunding contract.
//!
//! The snapshot is replaced, never patched field by field: each refresh group
//! produces a [`CampaignUpdate`] and [`CampaignSnapshot::with`] returns the next
//! snapshot with only that group's fields changed.

/// Last known on-chain figures for the campaign. Amounts are in stroops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignSnapshot {
    pub total_raised: i128,
    pub goal_amount: i128,
    /// Unix seconds. 0 means unknown.
    pub deadline: u64,
    pub is_goal_reached: bool,
    pub is_ended: bool,
    /// Contract-computed, 0..=100.
    pub progress_percentage: u32,
}

/// Result of the combined status read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignStatus {
    pub is_goal_reached: bool,
    pub is_ended: bool,
    pub progress_percentage: u32,
}

/// Independent reads against the contract. Each one owns a disjoint set of
/// snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshGroup {
    Total,
    Goal,
    Deadline,
    Status,
}

impl RefreshGroup {
    pub const ALL: [RefreshGroup; 4] = [
        RefreshGroup::Total,
        RefreshGroup::Goal,
        RefreshGroup::Deadline,
        RefreshGroup::Status,
    ];
}

/// Output of one refresh group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignUpdate {
    Total(i128),
    Goal(i128),
    Deadline(u64),
    Status(CampaignStatus),
}

impl CampaignSnapshot {
    /// Next snapshot with `update` applied.
    pub fn with(self, update: CampaignUpdate) -> Self {
        match update {
            CampaignUpdate::Total(total_raised) => Self {
                total_raised,
                ..self
            },
            CampaignUpdate::Goal(goal_amount) => Self {
                goal_amount,
                ..self
            },
            CampaignUpdate::Deadline(deadline) => Self { deadline, ..self },
            CampaignUpdate::Status(status) => Self {
                is_goal_reached: status.is_goal_reached,
                is_ended: status.is_ended,
                progress_percentage: status.progress_percentage,
                ..self
            },
        }
    }

}
