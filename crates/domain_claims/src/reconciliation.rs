//! Extraction reconciliation
//!
//! Line items come out of document extraction and can be incomplete or
//! double counted. The sum of the extracted items is compared with the net
//! amount printed on the bill, and the size and direction of the gap select
//! a rule from an ordered policy table. The rule decides the extraction
//! status and how the published insurer/patient totals are corrected.
//!
//! # Default table
//!
//! ```text
//! gap <= 1%            any direction   accurate            no correction
//! gap <= 5%            over            minor_discrepancy   warning only
//! gap <= 5%            under           minor_discrepancy   shortfall charged to patient
//! gap  > 5%            over            over_extracted      insurer share scaled to net bill
//! gap  > 5%            under           under_extracted     shortfall charged to patient
//! ```
//!
//! Corrections apply to the claim totals only, never to individual items.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::error::ClaimError;
use crate::extraction::BillExtraction;

/// Default upper bound of the accurate band, in percent
pub const DEFAULT_ACCURATE_THRESHOLD_PCT: Decimal = dec!(1);
/// Default upper bound of the minor discrepancy band, in percent
pub const DEFAULT_MINOR_THRESHOLD_PCT: Decimal = dec!(5);

/// How well the extracted items match the bill total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Accurate,
    MinorDiscrepancy,
    /// Items exceed the bill, likely double counting
    OverExtracted,
    /// Items fall short of the bill, likely missed lines
    UnderExtracted,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Accurate => "accurate",
            ExtractionStatus::MinorDiscrepancy => "minor_discrepancy",
            ExtractionStatus::OverExtracted => "over_extracted",
            ExtractionStatus::UnderExtracted => "under_extracted",
        }
    }
}

/// Sign of the gap between extracted items and the net bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyDirection {
    /// Items sum to more than the net bill
    Over,
    /// Items sum to the net bill or less
    Under,
}

impl DiscrepancyDirection {
    pub fn of(discrepancy: &Money) -> Self {
        if discrepancy.is_positive() {
            DiscrepancyDirection::Over
        } else {
            DiscrepancyDirection::Under
        }
    }
}

/// Correction applied to the published totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectiveAction {
    /// Totals stand as computed
    None,
    /// Totals stand, the warning flags the gap
    WarnOnly,
    /// The magnitude of the gap is added to the patient's share
    ChargeShortfallToPatient,
    /// Insurer share is scaled by net bill / extracted total and the patient
    /// pays the rest of the net bill
    ScaleToNetBill,
}

/// One row of the reconciliation policy table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationRule {
    pub status: ExtractionStatus,
    /// Inclusive upper bound on the discrepancy percentage; `None` is unbounded
    pub upper_bound_pct: Option<Decimal>,
    /// Direction this rule applies to; `None` matches both
    pub direction: Option<DiscrepancyDirection>,
    pub action: CorrectiveAction,
}

impl ReconciliationRule {
    pub fn new(
        status: ExtractionStatus,
        upper_bound_pct: Option<Decimal>,
        direction: Option<DiscrepancyDirection>,
        action: CorrectiveAction,
    ) -> Self {
        Self {
            status,
            upper_bound_pct,
            direction,
            action,
        }
    }

    /// Returns true when this rule covers the given gap
    pub fn matches(&self, discrepancy_pct: Decimal, direction: DiscrepancyDirection) -> bool {
        let within_bound = self
            .upper_bound_pct
            .map_or(true, |bound| discrepancy_pct <= bound);
        let same_direction = self.direction.map_or(true, |d| d == direction);
        within_bound && same_direction
    }
}

/// Ordered policy table; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationPolicy {
    rules: Vec<ReconciliationRule>,
}

impl Default for ReconciliationPolicy {
    fn default() -> Self {
        Self {
            rules: standard_rules(DEFAULT_ACCURATE_THRESHOLD_PCT, DEFAULT_MINOR_THRESHOLD_PCT),
        }
    }
}

fn standard_rules(accurate_pct: Decimal, minor_pct: Decimal) -> Vec<ReconciliationRule> {
    use DiscrepancyDirection::{Over, Under};
    use ExtractionStatus::{Accurate, MinorDiscrepancy, OverExtracted, UnderExtracted};

    vec![
        ReconciliationRule::new(Accurate, Some(accurate_pct), None, CorrectiveAction::None),
        ReconciliationRule::new(MinorDiscrepancy, Some(minor_pct), Some(Over), CorrectiveAction::WarnOnly),
        ReconciliationRule::new(
            MinorDiscrepancy,
            Some(minor_pct),
            Some(Under),
            CorrectiveAction::ChargeShortfallToPatient,
        ),
        ReconciliationRule::new(OverExtracted, None, Some(Over), CorrectiveAction::ScaleToNetBill),
        ReconciliationRule::new(
            UnderExtracted,
            None,
            Some(Under),
            CorrectiveAction::ChargeShortfallToPatient,
        ),
    ]
}

impl ReconciliationPolicy {
    /// Creates a policy from an explicit table
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::InvalidPolicy` if the table is empty, has a
    /// negative bound, or leaves some gap in either direction unclassified.
    pub fn new(rules: Vec<ReconciliationRule>) -> Result<Self, ClaimError> {
        if rules.is_empty() {
            return Err(ClaimError::invalid_policy("table has no rules"));
        }
        if let Some(rule) = rules
            .iter()
            .find(|r| r.upper_bound_pct.is_some_and(|b| b.is_sign_negative() && !b.is_zero()))
        {
            return Err(ClaimError::invalid_policy(format!(
                "negative bound for {} rule",
                rule.status.as_str()
            )));
        }
        for direction in [DiscrepancyDirection::Over, DiscrepancyDirection::Under] {
            let exhaustive = rules.iter().any(|r| {
                r.upper_bound_pct.is_none() && r.direction.map_or(true, |d| d == direction)
            });
            if !exhaustive {
                return Err(ClaimError::invalid_policy(format!(
                    "no unbounded rule for {:?} discrepancies",
                    direction
                )));
            }
        }
        Ok(Self { rules })
    }

    /// Creates the standard table with tuned band limits
    ///
    /// # Arguments
    ///
    /// * `accurate_pct` - Largest gap still treated as accurate
    /// * `minor_pct` - Largest gap treated as a minor discrepancy
    pub fn with_thresholds(accurate_pct: Decimal, minor_pct: Decimal) -> Result<Self, ClaimError> {
        if accurate_pct > minor_pct {
            return Err(ClaimError::invalid_policy(format!(
                "accurate threshold {}% exceeds minor threshold {}%",
                accurate_pct, minor_pct
            )));
        }
        Self::new(standard_rules(accurate_pct, minor_pct))
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[ReconciliationRule] {
        &self.rules
    }

    /// Selects the rule for a gap
    pub fn classify(&self, discrepancy_pct: Decimal, direction: DiscrepancyDirection) -> &ReconciliationRule {
        // Tables are exhaustive by construction, the last rule is only a guard.
        self.rules
            .iter()
            .find(|rule| rule.matches(discrepancy_pct, direction))
            .unwrap_or(&self.rules[self.rules.len() - 1])
    }

    /// Applies the matching rule to the claim totals
    ///
    /// # Arguments
    ///
    /// * `check` - Measured gap between extracted items and the bill
    /// * `insurer_pays` - Insurer total after the sum insured cap
    /// * `patient_pays` - Patient total after the sum insured cap
    pub fn reconcile(
        &self,
        check: &ExtractionCheck,
        insurer_pays: Money,
        patient_pays: Money,
    ) -> Reconciliation {
        let direction = DiscrepancyDirection::of(&check.discrepancy);
        let rule = self.classify(check.discrepancy_pct, direction);

        let mut outcome = Reconciliation {
            status: rule.status,
            action: rule.action,
            insurer_pays,
            patient_pays,
            scale_factor: None,
            warning: describe(rule.status, direction, check),
        };

        match rule.action {
            CorrectiveAction::None | CorrectiveAction::WarnOnly => {}
            CorrectiveAction::ChargeShortfallToPatient => {
                outcome.patient_pays += check.discrepancy.abs();
            }
            CorrectiveAction::ScaleToNetBill => match check.net_bill.ratio_to(&check.sum_of_items) {
                Ok(factor) => {
                    outcome.insurer_pays = insurer_pays * factor;
                    outcome.patient_pays = check.net_bill - outcome.insurer_pays;
                    outcome.scale_factor = Some(factor);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Cannot scale totals to net bill, leaving them unchanged");
                }
            },
        }

        if rule.status != ExtractionStatus::Accurate {
            tracing::warn!(
                status = rule.status.as_str(),
                discrepancy = %check.discrepancy,
                discrepancy_pct = %check.discrepancy_pct.round_dp(1),
                "{}",
                outcome.warning
            );
        }

        outcome
    }
}

/// Gap between the extracted line items and the bill's net amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionCheck {
    /// Bill total less discount
    pub net_bill: Money,
    pub sum_of_items: Money,
    /// `sum_of_items - net_bill`; positive when over-extracted
    pub discrepancy: Money,
    /// Magnitude of the discrepancy relative to the net bill, zero when the
    /// net bill is not positive
    pub discrepancy_pct: Decimal,
    pub line_count: usize,
}

impl ExtractionCheck {
    /// Measures a bill's extraction gap
    pub fn measure(bill: &BillExtraction) -> Self {
        let net_bill = bill.net_amount();
        let sum_of_items: Money = bill.line_items.iter().map(|item| item.amount).sum();
        let discrepancy = sum_of_items - net_bill;

        let discrepancy_pct = if net_bill.is_positive() {
            discrepancy.percentage_of(&net_bill).unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        };

        Self {
            net_bill,
            sum_of_items,
            discrepancy,
            discrepancy_pct,
            line_count: bill.line_items.len(),
        }
    }
}

/// Outcome of reconciliation, with unrounded totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub status: ExtractionStatus,
    pub action: CorrectiveAction,
    pub insurer_pays: Money,
    pub patient_pays: Money,
    /// Factor applied to the insurer share by `ScaleToNetBill`
    pub scale_factor: Option<Decimal>,
    pub warning: String,
}

fn describe(status: ExtractionStatus, direction: DiscrepancyDirection, check: &ExtractionCheck) -> String {
    let items = check.sum_of_items.round_to_currency();
    let net = check.net_bill.round_to_currency();
    let gap = check.discrepancy.abs().round_to_currency();
    let pct = check.discrepancy_pct.round_dp(1);

    match (status, direction) {
        (ExtractionStatus::Accurate, _) => format!(
            "Extraction accurate: items total {} vs bill total {} ({:.1}% difference)",
            items, net, pct
        ),
        (ExtractionStatus::MinorDiscrepancy, DiscrepancyDirection::Over) => format!(
            "Minor over-extraction: items total {} vs bill total {} ({:.1}% over)",
            items, net, pct
        ),
        (ExtractionStatus::MinorDiscrepancy, DiscrepancyDirection::Under) => format!(
            "Minor under-extraction: items total {} vs bill total {} ({:.1}% under)",
            items, net, pct
        ),
        (ExtractionStatus::OverExtracted, _) => format!(
            "Possible double-counting: items total {} exceeds bill total {} by {} ({:.1}%)",
            items, net, gap, pct
        ),
        (ExtractionStatus::UnderExtracted, _) => format!(
            "Incomplete extraction: {} items totaling {}, but bill total is {}. Missing {} ({:.1}%)",
            check.line_count, items, net, gap, pct
        ),
    }
}
