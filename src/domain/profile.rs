//! User account attributes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{PoolId, PrincipalId};
use super::money::Btc;

/// Registered profile record held by the core service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub principal: PrincipalId,
    pub registered_at: Option<DateTime<Utc>>,
    pub pools: Vec<PoolId>,
}

/// Account view owned by the aggregator.
///
/// Empty on start, populated after sign-in or registration, cleared on
/// sign-out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserState {
    pub profile: Option<UserProfile>,
    pub balance: Btc,
    pub is_authenticated: bool,
    pub is_registered: bool,
    pub principal: Option<PrincipalId>,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            profile: None,
            balance: Decimal::ZERO,
            is_authenticated: false,
            is_registered: false,
            principal: None,
        }
    }
}
