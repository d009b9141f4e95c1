//! Item lifecycle state machine.
//!
//! An item starts in `ToCollect` and only ever moves forward:
//! reservation, retrieval, or time-driven expiry. Archiving is an
//! orthogonal one-way flag handled by the store, not a status.

use poem_openapi::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of days an unreserved item stays collectable before it expires.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Days an expired item remains visible to the administrator before it is
/// dropped from fetch results entirely.
pub const DEFAULT_EXPIRY_GRACE_DAYS: i64 = 1;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Status of a found item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, Serialize, Deserialize)]
#[oai(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Waiting for its owner, visible to the public.
    ToCollect,
    /// Someone claimed it and left contact details.
    Reserved,
    /// Handed back to its owner.
    Retrieved,
    /// Sat unclaimed past the retention window.
    Expired,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::ToCollect => "to_collect",
            ItemStatus::Reserved => "reserved",
            ItemStatus::Retrieved => "retrieved",
            ItemStatus::Expired => "expired",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition for the
    /// given actor. Expiry is excluded on purpose: it is driven by elapsed
    /// time (see [`is_expired`]), never requested.
    pub fn can_transition(self, next: ItemStatus, actor: Actor) -> bool {
        use ItemStatus::*;
        match (self, next, actor) {
            (ToCollect, Reserved, _) => true,
            (ToCollect, Retrieved, Actor::Admin) => true,
            (Reserved, Retrieved, Actor::Admin) => true,
            // Administrative override: un-reserve without a form round trip.
            (Reserved, ToCollect, Actor::Admin) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_collect" => Ok(ItemStatus::ToCollect),
            "reserved" => Ok(ItemStatus::Reserved),
            "retrieved" => Ok(ItemStatus::Retrieved),
            "expired" => Ok(ItemStatus::Expired),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Status string in the database did not match any known status.
#[derive(Debug, thiserror::Error)]
#[error("unknown item status: {0}")]
pub struct UnknownStatus(pub String);

/// Who requested a transition. Legality depends on it: a public
/// reservation is narrower than what an administrator may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// A visitor reserving an item through the public form.
    Visitor,
    /// The administrator acting through the dashboard. May also toggle
    /// `ToCollect <-> Reserved` directly, bypassing reserver capture.
    Admin,
}

/// Timestamp (epoch seconds) at which an item created at `created_at`
/// expires if never reserved.
pub fn expires_at(created_at: i64, retention_days: i64) -> i64 {
    created_at + retention_days * SECONDS_PER_DAY
}

/// True when a `ToCollect` item created at `created_at` has outlived the
/// retention window at time `now`.
pub fn is_expired(created_at: i64, now: i64, retention_days: i64) -> bool {
    now > expires_at(created_at, retention_days)
}

/// Timestamp past which an expired item is no longer returned by fetches.
/// The grace window is measured from the expiry transition, which is itself
/// a pure function of `created_at`.
pub fn visibility_cutoff(created_at: i64, retention_days: i64, grace_days: i64) -> i64 {
    expires_at(created_at, retention_days) + grace_days * SECONDS_PER_DAY
}
