//! arb-reconcile — C7, the pure settlement classifier.
//!
//! Grounded on the teacher's `mqk-reconcile::reconcile` pattern: a free
//! function with no I/O, no clock, no side effects, total over its input
//! domain. Every terminal `(pos, hedge)` pair yields exactly one result.

use arb_schemas::SettlementStatus;

/// Outcome of reconciling a settled pair's two leg statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Expected,
    Exposure { reason: String },
}

impl Classification {
    pub fn is_expected(&self) -> bool {
        matches!(self, Classification::Expected)
    }
}

/// Decision table, evaluated top-to-bottom, first match wins. Pending
/// statuses are never meant to reach this function — a watcher only calls
/// it once both legs are terminal — but the table stays total over the
/// whole enum: any combination not explicitly named falls to the
/// catch-all `partial_settlement_<pos>_<hedge>` exposure.
pub fn classify(pos: SettlementStatus, hedge: SettlementStatus) -> Classification {
    use SettlementStatus::*;

    if pos == Void && hedge != Void {
        return Classification::Exposure {
            reason: "positive_void_hedge_active".to_string(),
        };
    }
    if pos != Void && hedge == Void {
        return Classification::Exposure {
            reason: "hedge_void_positive_active".to_string(),
        };
    }
    if pos == Void && hedge == Void {
        return Classification::Expected;
    }
    if pos.is_half() || hedge.is_half() {
        return Classification::Exposure {
            reason: partial_settlement_reason(pos, hedge),
        };
    }
    if pos == Lost && hedge == Lost {
        return Classification::Exposure {
            reason: "both_lost_unexpected".to_string(),
        };
    }
    if pos == Won && hedge == Won {
        return Classification::Exposure {
            reason: "both_won_unexpected".to_string(),
        };
    }
    if (pos == Won && hedge == Lost) || (pos == Lost && hedge == Won) {
        return Classification::Expected;
    }
    Classification::Exposure {
        reason: partial_settlement_reason(pos, hedge),
    }
}

fn partial_settlement_reason(pos: SettlementStatus, hedge: SettlementStatus) -> String {
    format!(
        "partial_settlement_{}_{}",
        pos.as_wire_str(),
        hedge.as_wire_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use SettlementStatus::*;

    #[test]
    fn won_lost_is_expected() {
        assert_eq!(classify(Won, Lost), Classification::Expected);
        assert_eq!(classify(Lost, Won), Classification::Expected);
    }

    #[test]
    fn both_void_is_expected() {
        assert_eq!(classify(Void, Void), Classification::Expected);
    }

    #[test]
    fn one_sided_void_is_exposure() {
        assert_eq!(
            classify(Void, Won),
            Classification::Exposure { reason: "positive_void_hedge_active".into() }
        );
        assert_eq!(
            classify(Lost, Void),
            Classification::Exposure { reason: "hedge_void_positive_active".into() }
        );
    }

    #[test]
    fn half_settlement_is_exposure_regardless_of_which_leg() {
        assert_eq!(
            classify(HalfWon, Lost),
            Classification::Exposure { reason: "partial_settlement_half_won_lost".into() }
        );
        assert_eq!(
            classify(Won, HalfLost),
            Classification::Exposure { reason: "partial_settlement_won_half_lost".into() }
        );
    }

    #[test]
    fn both_lost_and_both_won_are_exposure() {
        assert_eq!(
            classify(Lost, Lost),
            Classification::Exposure { reason: "both_lost_unexpected".into() }
        );
        assert_eq!(
            classify(Won, Won),
            Classification::Exposure { reason: "both_won_unexpected".into() }
        );
    }

    #[test]
    fn timeout_and_error_are_exposure() {
        assert_eq!(
            classify(Timeout, Timeout),
            Classification::Exposure { reason: "partial_settlement_timeout_timeout".into() }
        );
        assert_eq!(
            classify(Won, Error),
            Classification::Exposure { reason: "partial_settlement_won_error".into() }
        );
    }

    /// Exhaustive sweep over every terminal status pair: the table must
    /// yield exactly one result for each, never panic.
    #[test]
    fn table_is_total_over_all_terminal_pairs() {
        let statuses = [Pending, Won, Lost, Void, HalfWon, HalfLost, Timeout, Error];
        for &p in &statuses {
            for &h in &statuses {
                let _ = classify(p, h);
            }
        }
    }
}
