use serde::{Deserialize, Serialize};

/// Complaint counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusTotals {
    pub all: u64,
    pub resolved: u64,
    pub pending: u64,
    pub under_review: u64,
}

/// One `$group` bucket. `_id` is the grouped value (null when the field is missing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GroupCount {
    #[serde(rename = "_id")]
    pub key: Option<String>,
    pub count: u64,
}

/// Field a complaint aggregation groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Zone,
    ViolationType,
}

impl GroupField {
    pub fn document_key(&self) -> &'static str {
        match self {
            GroupField::Zone => "zone",
            GroupField::ViolationType => "violation_type_manual",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AnalyticsSummary {
    pub totals: StatusTotals,
    /// Complaints per zone, busiest first
    pub hotspots: Vec<GroupCount>,
    /// Complaints per manual violation type, most frequent first
    pub violations: Vec<GroupCount>,
    pub avg_resolution_hours: u32,
}

/// Orders buckets by count descending, then key ascending so ties are stable.
pub fn sort_group_counts(groups: &mut [GroupCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}
