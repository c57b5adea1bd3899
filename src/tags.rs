// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tag conventions that tie the two legs of a transfer together.
//!
//! Both legs carry `transfer` (or `dps` as well for DPS moves) plus
//! `key:value` tags for the correlation id, the other account and the
//! converted amount.

use rust_decimal::Decimal;

pub const TRANSFER: &str = "transfer";
pub const DPS: &str = "dps";

const TRANSFER_ID: &str = "transfer_id:";
const COUNTERPARTY: &str = "counterparty:";
const CONVERTED_AMOUNT: &str = "converted_amount:";
const EXCHANGE_RATE: &str = "exchange_rate:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Transfer,
    Dps,
}

/// Metadata recovered from the tags of one transfer leg.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferMeta {
    pub kind: TransferKind,
    pub transfer_id: String,
    pub counterparty: Option<String>,
    pub converted_amount: Option<Decimal>,
    pub exchange_rate: Option<Decimal>,
}

pub fn new_transfer_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn correlation_tag(transfer_id: &str) -> String {
    format!("{TRANSFER_ID}{transfer_id}")
}

/// Tags for one leg of a transfer.
pub fn leg_tags(
    kind: TransferKind,
    transfer_id: &str,
    counterparty: &str,
    converted_amount: Decimal,
    exchange_rate: Decimal,
) -> Vec<String> {
    let mut tags = vec![TRANSFER.to_string()];
    if kind == TransferKind::Dps {
        tags.push(DPS.to_string());
    }
    tags.push(correlation_tag(transfer_id));
    tags.push(format!("{COUNTERPARTY}{counterparty}"));
    tags.push(format!("{CONVERTED_AMOUNT}{}", converted_amount.normalize()));
    tags.push(format!("{EXCHANGE_RATE}{}", exchange_rate.normalize()));
    tags
}

/// True for either leg of a transfer or DPS move.
pub fn is_transfer(tags: &[String]) -> bool {
    tags.iter().any(|t| t == TRANSFER || t == DPS)
}

pub fn transfer_id(tags: &[String]) -> Option<&str> {
    tags.iter().find_map(|t| t.strip_prefix(TRANSFER_ID))
}

pub fn parse(tags: &[String]) -> Option<TransferMeta> {
    let transfer_id = transfer_id(tags)?.to_string();
    let kind = if tags.iter().any(|t| t == DPS) {
        TransferKind::Dps
    } else {
        TransferKind::Transfer
    };
    let value = |prefix: &str| tags.iter().find_map(|t| t.strip_prefix(prefix));
    Some(TransferMeta {
        kind,
        transfer_id,
        counterparty: value(COUNTERPARTY).map(str::to_string),
        converted_amount: value(CONVERTED_AMOUNT).and_then(|s| s.parse().ok()),
        exchange_rate: value(EXCHANGE_RATE).and_then(|s| s.parse().ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dps_legs_are_marked_and_parsed() {
        let tags = leg_tags(
            TransferKind::Dps,
            "abc",
            "acct-2",
            Decimal::new(5000, 2),
            Decimal::ONE,
        );
        assert!(is_transfer(&tags));
        assert!(tags.contains(&"dps".to_string()));
        let meta = parse(&tags).unwrap();
        assert_eq!(meta.kind, TransferKind::Dps);
        assert_eq!(meta.transfer_id, "abc");
        assert_eq!(meta.counterparty.as_deref(), Some("acct-2"));
        assert_eq!(meta.converted_amount, Some(Decimal::new(50, 0)));
    }

    #[test]
    fn plain_tags_are_not_transfers() {
        let tags = vec!["groceries".to_string()];
        assert!(!is_transfer(&tags));
        assert!(parse(&tags).is_none());
    }
}
