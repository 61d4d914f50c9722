//! Fixed-width rendering of a calculation result

use std::fmt;

use domain_claims::{CalculationResult, MatchedItem};

const ITEM_WIDTH: usize = 28;
const STATUS_WIDTH: usize = 14;
const AMOUNT_WIDTH: usize = 12;
const LABEL_WIDTH: usize = 26;
const TABLE_WIDTH: usize = ITEM_WIDTH + STATUS_WIDTH + AMOUNT_WIDTH * COLUMNS.len();

const COLUMNS: [&str; 7] = ["Billed", "Limit", "Eligible", "Excess", "Copay", "Insurer", "Patient"];

/// Fixed-width view of a calculation result
pub struct TableReport<'a>(pub &'a CalculationResult);

/// Renders the per-item breakdown followed by the claim totals
pub fn render_table(result: &CalculationResult) -> String {
    TableReport(result).to_string()
}

impl fmt::Display for TableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let rule = "-".repeat(TABLE_WIDTH);

        write!(f, "{:<ITEM_WIDTH$}{:<STATUS_WIDTH$}", "Item", "Status")?;
        for column in COLUMNS {
            write!(f, "{:>AMOUNT_WIDTH$}", column)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", rule)?;

        for item in &result.matched_items {
            write_item(f, item)?;
        }
        writeln!(f, "{}", rule)?;

        let breakdown = &result.sum_insured;
        let rows = [
            ("Base sum insured", breakdown.base_sum_insured.to_string()),
            ("NCB bonus", breakdown.ncb_bonus_applied.to_string()),
            ("Loyalty bonus", breakdown.loyalty_bonus_applied.to_string()),
            ("Effective sum insured", breakdown.effective_sum_insured.to_string()),
            ("Bill total", result.total_bill_amount.to_string()),
            ("Discount", result.total_discount.to_string()),
            ("Net bill", result.net_bill_amount.to_string()),
            ("Total eligible", result.total_eligible.to_string()),
            ("Total excess", result.total_excess.to_string()),
            ("Total copay", result.total_copay.to_string()),
            ("Sum insured overflow", result.sum_insured_overflow.to_string()),
            ("Insurer pays", result.insurer_pays.to_string()),
            ("Patient pays", result.patient_pays.to_string()),
            ("Extraction status", result.extraction_status.as_str().to_string()),
        ];
        for (label, value) in rows {
            writeln!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", label, value)?;
        }
        if let Some(factor) = result.scale_factor {
            writeln!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", "Scale factor", factor.to_string())?;
        }
        writeln!(f)?;
        writeln!(f, "{}", result.warning)
    }
}

fn write_item(f: &mut fmt::Formatter<'_>, item: &MatchedItem) -> fmt::Result {
    let limit = item
        .policy_limit
        .map(|limit| limit.to_string())
        .unwrap_or_else(|| "-".to_string());

    write!(
        f,
        "{:<ITEM_WIDTH$}{:<STATUS_WIDTH$}",
        fit(&item.bill_item, ITEM_WIDTH - 1),
        item.coverage_status.as_str()
    )?;
    for value in [
        item.bill_amount.to_string(),
        limit,
        item.eligible_amount.to_string(),
        item.excess_amount.to_string(),
        item.copay_amount.to_string(),
        item.insurer_pays.to_string(),
        item.patient_pays.to_string(),
    ] {
        write!(f, "{:>AMOUNT_WIDTH$}", value)?;
    }
    writeln!(f)?;

    if let Some(reason) = &item.exclusion_reason {
        writeln!(f, "  excluded: {}", reason)?;
    }
    Ok(())
}

/// Truncates a name to at most `max` characters
fn fit(name: &str, max: usize) -> String {
    let name = name.trim();
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(max.saturating_sub(3)).collect();
        short.push_str("...");
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::calculate_claim;
    use test_utils::{BillFixtures, BondFixtures};

    #[test]
    fn test_table_lists_every_item() {
        let result = calculate_claim(&BillFixtures::hospitalisation(), &BondFixtures::hospitalisation());

        let table = render_table(&result);

        for item in &result.matched_items {
            assert!(table.contains(item.bill_item.as_str()));
        }
        assert!(table.contains("not_mentioned"));
        assert!(table.contains("excluded: Non-medical consumables are not payable"));
    }

    #[test]
    fn test_table_totals_and_warning() {
        let result = calculate_claim(&BillFixtures::over_extracted(), &BondFixtures::hospitalisation());

        let table = render_table(&result);

        assert!(table.contains("Insurer pays"));
        assert!(table.contains("9000.00"));
        assert!(table.contains("Scale factor"));
        assert!(table.trim_end().ends_with(result.warning.as_str()));
    }

    #[test]
    fn test_rows_have_fixed_width() {
        let result = calculate_claim(&BillFixtures::hospitalisation(), &BondFixtures::hospitalisation());
        let table = render_table(&result);

        let item_rows: Vec<&str> = table.lines().skip(2).take(result.matched_items.len()).collect();
        assert!(item_rows
            .iter()
            .filter(|row| !row.starts_with("  excluded"))
            .all(|row| row.chars().count() == TABLE_WIDTH));
    }

    #[test]
    fn test_report_displays_like_rendered_table() {
        let result = calculate_claim(&BillFixtures::accurate(), &BondFixtures::hospitalisation());

        let report = TableReport(&result);

        assert_eq!(format!("{}", report), render_table(&result));
        assert!(report.to_string().lines().next().is_some_and(|header| header.starts_with("Item")));
    }

    #[test]
    fn test_fit_truncates_long_names() {
        assert_eq!(fit("Room Rent", 20), "Room Rent");
        assert_eq!(fit("Very long consumables description", 12), "Very long...");
    }
}
