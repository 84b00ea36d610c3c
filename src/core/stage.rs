use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::TrackError;

/// Pipeline stage of an application. Declaration order is column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    Wishlist,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl StageId {
    pub const ALL: [StageId; 5] = [
        StageId::Wishlist,
        StageId::Applied,
        StageId::Interview,
        StageId::Offer,
        StageId::Rejected,
    ];

    pub fn id(self) -> &'static str {
        match self {
            StageId::Wishlist => "wishlist",
            StageId::Applied => "applied",
            StageId::Interview => "interview",
            StageId::Offer => "offer",
            StageId::Rejected => "rejected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StageId::Wishlist => "Wishlist",
            StageId::Applied => "Applied",
            StageId::Interview => "Interviewing",
            StageId::Offer => "Offer",
            StageId::Rejected => "Closed",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<StageId> {
        StageId::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<StageId> {
        self.index()
            .checked_sub(1)
            .and_then(|idx| StageId::ALL.get(idx).copied())
    }
}

impl Default for StageId {
    fn default() -> Self {
        StageId::Wishlist
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StageId {
    type Err = TrackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        StageId::ALL
            .into_iter()
            .find(|stage| {
                stage.id().eq_ignore_ascii_case(needle) || stage.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| {
                let known: Vec<&str> = StageId::ALL.iter().map(|stage| stage.id()).collect();
                TrackError::validation(
                    "status",
                    format!("unknown stage '{needle}' (expected one of {})", known.join(", ")),
                )
            })
    }
}
