use stokvel_core::{Money, Transaction};
use tracing::debug;

use crate::amounts::parse_amount;
use crate::dates::parse_date;
use crate::document::Table;

/// Column positions for date/description/amount/balance within a table.
struct ColumnMap {
    date: usize,
    description: usize,
    amount: Option<usize>,
    balance: Option<usize>,
    /// Index of the first data row (header rows are above it).
    data_start: usize,
}

/// Parse a structured table into transactions. Rows with an unparseable date
/// or an empty description are skipped; empty amount cells read as zero.
pub fn extract_from_table(table: &Table) -> Vec<Transaction> {
    let Some(columns) = locate_columns(table) else {
        return Vec::new();
    };

    let mut transactions = Vec::new();
    for row in table.rows.iter().skip(columns.data_start) {
        if let Some(tx) = parse_row(row, &columns) {
            transactions.push(tx);
        }
    }
    transactions
}

/// Look for a header row in the first three rows; fall back to positional
/// columns (0, 1, n-2, n-1) when no header is present. A header must name
/// date, description and at least one monetary column, otherwise a narrative
/// row mentioning those words would swallow the real data rows.
fn locate_columns(table: &Table) -> Option<ColumnMap> {
    let first_row = table.rows.first()?;

    for (row_idx, row) in table.rows.iter().take(3).enumerate() {
        let mut date = None;
        let mut description = None;
        let mut amount = None;
        let mut balance = None;

        for (col, cell) in row.iter().enumerate() {
            let cell = cell.to_lowercase();
            if cell.contains("date") && date.is_none() {
                date = Some(col);
            } else if cell.contains("description") && description.is_none() {
                description = Some(col);
            } else if cell.contains("amount") && amount.is_none() {
                amount = Some(col);
            } else if cell.contains("balance") && balance.is_none() {
                balance = Some(col);
            }
        }

        if let (Some(date), Some(description), true) =
            (date, description, amount.is_some() || balance.is_some())
        {
            debug!(date, description, ?amount, ?balance, "table header detected");
            return Some(ColumnMap {
                date,
                description,
                amount,
                balance,
                data_start: row_idx + 1,
            });
        }
    }

    let width = first_row.len();
    Some(ColumnMap {
        date: 0,
        description: 1,
        amount: if width >= 3 { Some(width - 2) } else { None },
        balance: if width >= 2 { Some(width - 1) } else { None },
        data_start: 0,
    })
}

fn parse_row(row: &[String], columns: &ColumnMap) -> Option<Transaction> {
    let date_cell = row.get(columns.date)?.trim();
    let description = row.get(columns.description)?.trim();

    // Repeated header rows show up mid-table on multi-page statements.
    if date_cell.is_empty()
        || description.is_empty()
        || date_cell.to_lowercase().contains("date")
        || description.to_lowercase().contains("description")
    {
        return None;
    }

    let date = match parse_date(date_cell, &[]) {
        Ok(date) => date,
        Err(err) => {
            debug!(%err, row = ?row, "skipping table row");
            return None;
        }
    };

    let amount = cell_amount(row, columns.amount);
    let balance = cell_amount(row, columns.balance);

    Some(Transaction::new(date, description.to_string(), amount, balance))
}

fn cell_amount(row: &[String], column: Option<usize>) -> Money {
    column
        .and_then(|col| row.get(col))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .and_then(|cell| parse_amount(cell).ok())
        .unwrap_or_else(Money::zero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn header_row_maps_columns() {
        let table = Table::new(vec![
            row(&["Date", "Description", "Amount", "Balance"]),
            row(&["01/06/2024", "SALARY PAYMENT", "R20,000.00", "R25,000.00"]),
            row(&["02/06/2024", "POS PURCHASE CHECKERS", "-R450.00", "R24,550.00"]),
        ]);
        let txs = extract_from_table(&table);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(txs[0].amount, Money::from_cents(2_000_000));
        assert_eq!(txs[1].amount, Money::from_cents(-45000));
        assert_eq!(txs[1].balance, Money::from_cents(2_455_000));
    }

    #[test]
    fn headerless_table_uses_positional_columns() {
        let table = Table::new(vec![
            row(&["01/06/2024", "SALARY PAYMENT", "ref-991", "20,000.00", "25,000.00"]),
            row(&["03/06/2024", "DEBIT ORDER INSURANCE", "ref-992", "-1,200.00", "23,800.00"]),
        ]);
        let txs = extract_from_table(&table);
        assert_eq!(txs.len(), 2);
        // amount = column n-2, balance = column n-1
        assert_eq!(txs[0].amount, Money::from_cents(2_000_000));
        assert_eq!(txs[1].balance, Money::from_cents(2_380_000));
    }

    #[test]
    fn rows_with_bad_dates_or_blank_descriptions_are_skipped() {
        let table = Table::new(vec![
            row(&["Date", "Description", "Amount", "Balance"]),
            row(&["totals", "MONTHLY SUMMARY", "100.00", "200.00"]),
            row(&["01/06/2024", "", "100.00", "200.00"]),
            row(&["01/06/2024", "VALID ROW HERE", "100.00", "200.00"]),
        ]);
        let txs = extract_from_table(&table);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "VALID ROW HERE");
    }

    #[test]
    fn repeated_header_rows_mid_table_are_skipped() {
        let table = Table::new(vec![
            row(&["Date", "Description", "Amount", "Balance"]),
            row(&["01/06/2024", "FIRST PAGE ROW", "100.00", "200.00"]),
            row(&["Date", "Description", "Amount", "Balance"]),
            row(&["02/06/2024", "SECOND PAGE ROW", "100.00", "300.00"]),
        ]);
        assert_eq!(extract_from_table(&table).len(), 2);
    }

    #[test]
    fn header_without_monetary_column_is_not_a_header() {
        // A narrative first row naming only date and description must not be
        // mistaken for a header, or every amount would parse as zero.
        let table = Table::new(vec![
            row(&["Value date", "Description", "Reference", "Notes"]),
            row(&["01/06/2024", "POS PURCHASE STORE", "-100.00", "900.00"]),
            row(&["02/06/2024", "SALARY PAYMENT", "20,000.00", "20,900.00"]),
        ]);
        let txs = extract_from_table(&table);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].amount, Money::from_cents(-10_000));
        assert_eq!(txs[1].amount, Money::from_cents(2_000_000));
    }

    #[test]
    fn header_with_amount_but_no_balance_is_accepted() {
        let table = Table::new(vec![
            row(&["Date", "Description", "Amount"]),
            row(&["01/06/2024", "POS PURCHASE STORE", "-100.00"]),
        ]);
        let txs = extract_from_table(&table);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, Money::from_cents(-10_000));
        assert_eq!(txs[0].balance, Money::zero());
    }

    #[test]
    fn empty_amount_cells_read_as_zero() {
        let table = Table::new(vec![
            row(&["Date", "Description", "Amount", "Balance"]),
            row(&["01/06/2024", "PENDING AUTHORISATION", "", "200.00"]),
        ]);
        let txs = extract_from_table(&table);
        assert_eq!(txs[0].amount, Money::zero());
    }

    #[test]
    fn empty_table_yields_nothing() {
        assert!(extract_from_table(&Table::default()).is_empty());
    }
}
