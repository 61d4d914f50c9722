//! Claim-level totals and the sum insured ceiling

use core_kernel::Money;
use crate::adjudication::ItemSplit;

/// Unrounded claim totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClaimTotals {
    pub total_eligible: Money,
    pub total_excess: Money,
    pub total_copay: Money,
    pub insurer_pays: Money,
    pub patient_pays: Money,
    /// Insurer liability above the sum insured that was moved to the patient
    pub sum_insured_overflow: Money,
}

impl ClaimTotals {
    /// Sums item splits and caps insurer liability at the effective sum insured
    ///
    /// Only the totals are adjusted; the item splits are left as they were.
    pub fn aggregate<'a>(
        splits: impl IntoIterator<Item = &'a ItemSplit>,
        effective_sum_insured: Money,
    ) -> Self {
        let mut totals = ClaimTotals::default();
        for split in splits {
            totals.total_eligible += split.eligible_amount;
            totals.total_excess += split.excess_amount;
            totals.total_copay += split.copay_amount;
        }

        totals.insurer_pays = totals.total_eligible - totals.total_copay;
        totals.patient_pays = totals.total_excess + totals.total_copay;
        totals.cap_at(effective_sum_insured);
        totals
    }

    fn cap_at(&mut self, effective_sum_insured: Money) {
        if self.insurer_pays > effective_sum_insured {
            let overflow = self.insurer_pays - effective_sum_insured;
            tracing::warn!(
                insurer_pays = %self.insurer_pays,
                effective_sum_insured = %effective_sum_insured,
                overflow = %overflow,
                "Insurer liability exceeds sum insured, capping"
            );
            self.insurer_pays = effective_sum_insured;
            self.patient_pays += overflow;
            self.sum_insured_overflow = overflow;
        }
    }
}
