//! Turns ING export records into `Transaction` values.
//!
//! An export is a comma-delimited file with a header record followed by records of nine fields:
//!
//! ```text
//! "Datum","Naam / Omschrijving","Rekening","Tegenrekening","Code","Af Bij","Bedrag (EUR)","MutatieSoort","Mededelingen"
//! "20150103","ALBERT HEIJN 1234","NL00BANK0123456789","NL99BANK9876543210","BA","Af","12,34","Betaalautomaat",""
//! ```
//!
//! Parsing stops at the first bad record; nothing is skipped.

use crate::error::ParseError;
use crate::model::{Amount, Direction, MutationType, Transaction};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

pub const FIELD_COUNT: usize = 9;

const DATE: usize = 0;
const DESCRIPTION: usize = 1;
const ACCOUNT: usize = 2;
const CONTRA_ACCOUNT: usize = 3;
const CODE: usize = 4;
const DIRECTION: usize = 5;
const AMOUNT: usize = 6;
const MUTATION_TYPE: usize = 7;
const ANNOUNCEMENT: usize = 8;

const DATE_FORMAT: &str = "%Y%m%d";

/// Parses one export record into a `Transaction`.
///
/// # Errors
/// - `ParseError::MissingField` when there are fewer than nine fields
/// - `ParseError::Format` for a bad date, amount or direction token
/// - `ParseError::Integrity` when the channel code does not belong to the channel name, the channel
///   name is unknown, or the amount is negative
pub fn parse_row<S>(row: &[S]) -> std::result::Result<Transaction, ParseError>
where
    S: AsRef<str>,
{
    if row.len() < FIELD_COUNT {
        return Err(ParseError::MissingField {
            index: row.len(),
            found: row.len(),
        });
    }
    let field = |ix: usize| row[ix].as_ref();

    let date = parse_date(field(DATE))?;
    let magnitude = Amount::from_str(field(AMOUNT))
        .map_err(|e| ParseError::format("amount", field(AMOUNT), e.to_string()))?;
    let mutation_type = parse_mutation_type(field(MUTATION_TYPE), field(CODE))?;
    if magnitude.is_negative() {
        return Err(ParseError::integrity(
            "amount",
            field(AMOUNT),
            "the magnitude must not be negative",
        ));
    }
    let direction = Direction::from_str(field(DIRECTION)).map_err(|_| {
        ParseError::format("direction", field(DIRECTION), "expected 'Af' or 'Bij'")
    })?;

    Ok(Transaction::new(
        date,
        field(DESCRIPTION),
        field(ACCOUNT),
        field(CONTRA_ACCOUNT),
        mutation_type,
        magnitude,
        field(ANNOUNCEMENT),
        direction.is_withdrawal(),
    ))
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, ParseError> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::format("date", s, "expected 8 digits YYYYMMDD"));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| ParseError::format("date", s, e.to_string()))
}

fn parse_mutation_type(name: &str, code: &str) -> std::result::Result<MutationType, ParseError> {
    let mutation_type = MutationType::from_str(name)
        .map_err(|_| ParseError::integrity("mutation_type", name, "unknown mutation type"))?;
    if mutation_type.code() != code {
        return Err(ParseError::integrity(
            "code",
            code,
            format!(
                "'{name}' has code '{}', the record says '{code}'",
                mutation_type.code()
            ),
        ));
    }
    Ok(mutation_type)
}

/// Reads an export from `reader`, skipping the header record.
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (ix, result) in rdr.records().enumerate() {
        // header is line 1
        let line = ix + 2;
        let record = result.with_context(|| format!("Unable to read record at line {line}"))?;
        let fields: Vec<&str> = record.iter().collect();
        let transaction =
            parse_row(&fields).with_context(|| format!("Invalid record at line {line}"))?;
        trace!("{transaction}");
        transactions.push(transaction);
    }
    Ok(transactions)
}

/// Opens and reads the export at `path`.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Unable to open file {}", path.display()))?;
    let transactions =
        read_transactions(file).with_context(|| format!("Unable to parse {}", path.display()))?;
    debug!(
        "Read {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rust_decimal::Decimal;

    const ROW: [&str; 9] = [
        "20150103",
        "ALBERT HEIJN 1234",
        "NL00BANK0123456789",
        "NL99BANK9876543210",
        "BA",
        "Af",
        "12,34",
        "Betaalautomaat",
        "",
    ];

    fn with(ix: usize, value: &str) -> Vec<String> {
        let mut row: Vec<String> = ROW.iter().map(|s| s.to_string()).collect();
        row[ix] = value.to_string();
        row
    }

    fn kind_of(row: &[String]) -> ErrorKind {
        parse_row(row).unwrap_err().kind()
    }

    #[test]
    fn test_scenario_albert_heijn() {
        let t = parse_row(&ROW).unwrap();
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2015, 1, 3).unwrap());
        assert_eq!(t.amount().value(), Decimal::from_str("-12.34").unwrap());
        assert!(t.withdrawal());
        assert_eq!(t.mutation_type(), MutationType::Betaalautomaat);
        assert_eq!(t.description(), "ALBERT HEIJN 1234");
        assert_eq!(t.account(), "NL00BANK0123456789");
        assert_eq!(t.contra_account(), "NL99BANK9876543210");
        assert_eq!(t.announcement(), "");
    }

    #[test]
    fn test_bij_is_positive() {
        let t = parse_row(&with(DIRECTION, "Bij")).unwrap();
        assert_eq!(t.amount().value(), Decimal::from_str("12.34").unwrap());
        assert!(!t.withdrawal());
    }

    #[test]
    fn test_every_channel_with_its_code() {
        for t in MutationType::ALL {
            let mut row = with(MUTATION_TYPE, &t.to_string());
            row[CODE] = t.code().to_string();
            assert_eq!(parse_row(&row).unwrap().mutation_type(), t);
        }
    }

    #[test]
    fn test_code_mismatch_is_integrity() {
        let row = with(MUTATION_TYPE, "Diversen");
        let err = parse_row(&row).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert_eq!(err.field(), Some("code"));
    }

    #[test]
    fn test_unknown_channel_is_integrity() {
        assert_eq!(kind_of(&with(MUTATION_TYPE, "Chipknip")), ErrorKind::Integrity);
    }

    #[test]
    fn test_negative_magnitude_is_integrity() {
        let err = parse_row(&with(AMOUNT, "-12,34")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn test_bad_amount_is_format() {
        assert_eq!(kind_of(&with(AMOUNT, "12,34 EUR")), ErrorKind::Format);
        assert_eq!(kind_of(&with(AMOUNT, "")), ErrorKind::Format);
        assert_eq!(kind_of(&with(AMOUNT, "1_234,56")), ErrorKind::Format);
        assert_eq!(kind_of(&with(AMOUNT, "12,3_4")), ErrorKind::Format);
    }

    #[test]
    fn test_channel_is_checked_before_sign() {
        let mut row = with(AMOUNT, "-12,34");
        row[MUTATION_TYPE] = "Diversen".to_string();
        let err = parse_row(&row).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert_eq!(err.field(), Some("code"));
    }

    #[test]
    fn test_bad_amount_format_is_reported_before_channel() {
        let mut row = with(AMOUNT, "abc");
        row[MUTATION_TYPE] = "Diversen".to_string();
        let err = parse_row(&row).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn test_bad_direction_is_format() {
        let err = parse_row(&with(DIRECTION, "Uit")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.field(), Some("direction"));
    }

    #[test]
    fn test_bad_dates_are_format() {
        assert_eq!(kind_of(&with(DATE, "2015-01-03")), ErrorKind::Format);
        assert_eq!(kind_of(&with(DATE, "20150230")), ErrorKind::Format);
        assert_eq!(kind_of(&with(DATE, "2015013")), ErrorKind::Format);
        assert_eq!(kind_of(&with(DATE, "")), ErrorKind::Format);
    }

    #[test]
    fn test_short_record() {
        let err = parse_row(&ROW[..8]).unwrap_err();
        assert_eq!(err, ParseError::MissingField { index: 8, found: 8 });
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut row = ROW.to_vec();
        row.push("extra");
        assert_eq!(parse_row(&row).unwrap(), parse_row(&ROW).unwrap());
    }

    #[test]
    fn test_distinct_rows_give_distinct_transactions() {
        let base = parse_row(&ROW).unwrap();
        for (ix, value) in [
            (DATE, "20150104"),
            (DESCRIPTION, "JUMBO"),
            (ACCOUNT, "NL01"),
            (CONTRA_ACCOUNT, "NL02"),
            (DIRECTION, "Bij"),
            (AMOUNT, "12,35"),
            (ANNOUNCEMENT, "thanks"),
        ] {
            assert_ne!(parse_row(&with(ix, value)).unwrap(), base, "field {ix}");
        }
    }

    #[test]
    fn test_read_transactions_skips_header() {
        let data = "\
\"Datum\",\"Naam / Omschrijving\",\"Rekening\",\"Tegenrekening\",\"Code\",\"Af Bij\",\"Bedrag (EUR)\",\"MutatieSoort\",\"Mededelingen\"
\"20150103\",\"ALBERT HEIJN 1234\",\"NL00\",\"NL99\",\"BA\",\"Af\",\"12,34\",\"Betaalautomaat\",\"\"
\"20150105\",\"WERKGEVER BV\",\"NL00\",\"NL98\",\"OV\",\"Bij\",\"2000,00\",\"Overschrijving\",\"Salaris januari\"
";
        let transactions = read_transactions(data.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].announcement(), "Salaris januari");
        assert_eq!(
            transactions[1].amount().value(),
            Decimal::from_str("2000.00").unwrap()
        );
    }

    #[test]
    fn test_read_transactions_aborts_on_bad_record() {
        let data = "\
h0,h1,h2,h3,h4,h5,h6,h7,h8
20150103,A,NL00,NL99,BA,Af,\"1,00\",Betaalautomaat,
20150104,B,NL00,NL99,DV,Af,\"1,00\",Betaalautomaat,
20150105,C,NL00,NL99,BA,Af,\"1,00\",Betaalautomaat,
";
        let err = read_transactions(data.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
        let parse_error = err.downcast_ref::<ParseError>().unwrap();
        assert_eq!(parse_error.kind(), ErrorKind::Integrity);
    }

    #[test]
    fn test_read_transactions_empty_export() {
        let transactions = read_transactions("h0,h1\n".as_bytes()).unwrap();
        assert!(transactions.is_empty());
    }
}
