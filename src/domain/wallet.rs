//! Custody wallet details.

use serde::Serialize;

use super::money::Btc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletInfo {
    pub address: String,
    pub balance: Btc,
}
