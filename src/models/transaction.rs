use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;

use crate::models::errors::ParseError;
use crate::types::Step;

/// Number of positional fields carried by every raw record.
pub const FIELD_COUNT: usize = 11;

const DELIMITER: u8 = b',';

/// A single decoded transaction record.
///
/// Field order on the wire is: step, type, amount, nameOrig, oldbalanceOrg, newbalanceOrig,
/// nameDest, oldbalanceDest, newbalanceDest, isFraud, isFlaggedFraud. Account names and
/// balances are carried verbatim since nothing downstream interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Simulation step the transaction belongs to, `None` when the field is not an integer.
    pub step: Option<Step>,
    /// Category label (CASH_OUT, TRANSFER, ...).
    pub kind: String,
    /// Non-negative transaction amount.
    pub amount: Decimal,
    pub name_orig: String,
    pub old_balance_orig: String,
    pub new_balance_orig: String,
    pub name_dest: String,
    pub old_balance_dest: String,
    pub new_balance_dest: String,
    /// Whether the transaction is known to be fraudulent.
    pub is_fraud: bool,
    /// Whether the source system flagged the transaction as suspicious, `None` when not numeric.
    pub is_flagged_fraud: Option<bool>
}

impl Transaction {
    /// Decodes one raw delimited line into a transaction.
    ///
    /// # Errors
    /// Returns `ParseError::MalformedRecord` if the line does not hold exactly
    /// `FIELD_COUNT` fields, if the amount is not a plain non-negative decimal or if
    /// isFraud is not numeric. Step and isFlaggedFraud never reject a record.
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        let record = read_single_record(raw)?;

        if record.len() != FIELD_COUNT {
            return Err(ParseError::field_count(FIELD_COUNT, record.len()))
        }

        let field = |index: usize| record.get(index).unwrap_or_default();

        let amount = parse_amount(field(2))?;

        Ok(Self {
            step: Step::from_str(field(0)).ok(),
            kind: field(1).to_string(),
            amount,
            name_orig: field(3).to_string(),
            old_balance_orig: field(4).to_string(),
            new_balance_orig: field(5).to_string(),
            name_dest: field(6).to_string(),
            old_balance_dest: field(7).to_string(),
            new_balance_dest: field(8).to_string(),
            is_fraud: parse_flag("isFraud", field(9))?,
            is_flagged_fraud: parse_flag("isFlaggedFraud", field(10)).ok()
        })
    }

    /// Fraud filter: only transactions marked as fraud take part in the aggregation.
    pub fn is_fraudulent(&self) -> bool {
        self.is_fraud
    }
}

fn read_single_record(raw: &[u8]) -> Result<StringRecord, ParseError> {
    //NOTE: Quoting is disabled on purpose, the wire format is a plain split on the delimiter
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(DELIMITER)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw);

    let mut record = StringRecord::new();

    match reader.read_record(&mut record) {
        Ok(true) => {}
        Ok(false) => return Err(ParseError::empty()),
        Err(error) => return Err(ParseError::unreadable(error))
    }

    let mut trailing = StringRecord::new();

    match reader.read_record(&mut trailing) {
        Ok(false) => Ok(record),
        Ok(true) => Err(ParseError::multiple_lines()),
        Err(error) => Err(ParseError::unreadable(error))
    }
}

/// Accepts only plain decimal notation so the stored value renders exactly as it was read.
fn parse_amount(value: &str) -> Result<Decimal, ParseError> {
    if value.starts_with('-') {
        return Err(ParseError::negative_amount(value))
    }

    let digits = value.bytes().filter(u8::is_ascii_digit).count();
    let points = value.bytes().filter(|byte| *byte == b'.').count();

    //NOTE: Rejects exponents, underscores and signs which `Decimal` would otherwise normalise away
    if digits == 0 || points > 1 || digits + points != value.len() {
        return Err(ParseError::invalid_field("amount", value))
    }

    Decimal::from_str_exact(value).map_err(|_| ParseError::invalid_field("amount", value))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ParseError> {
    Decimal::from_str(value)
        .map(|flag| flag == Decimal::ONE)
        .map_err(|_| ParseError::invalid_field(name, value))
}
