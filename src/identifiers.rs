//! OCLC number normalization
//!
//! Catalog identifiers arrive as integers or as strings with or without one
//! of the legacy `ocm`/`ocn`/`on` prefixes. Everything is normalized to an
//! [`OclcNumber`] before a request is built, so a malformed identifier never
//! reaches the network.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static OCLC_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:ocm|ocn|on)?(\d+)$").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

/// Maximum OCLC numbers the service accepts in one batch parameter
pub const MAX_BATCH_SIZE: usize = 50;

/// A normalized OCLC control number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OclcNumber(u64);

impl OclcNumber {
    /// Wrap a raw number, rejecting zero
    pub fn new(value: u64) -> Result<Self> {
        if value == 0 {
            return Err(Error::invalid_oclc_number(
                "OCLC number must be a positive integer",
            ));
        }
        Ok(Self(value))
    }

    /// The numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OclcNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OclcNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = OCLC_NUMBER_RE
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| {
                Error::invalid_oclc_number(format!("'{s}' does not look like a real OCLC #"))
            })?;

        let value = digits.as_str().parse::<u64>().map_err(|_| {
            Error::invalid_oclc_number(format!("'{s}' is out of range for an OCLC #"))
        })?;
        Self::new(value)
    }
}

/// Conversion into a single [`OclcNumber`]
pub trait ToOclcNumber {
    fn to_oclc_number(&self) -> Result<OclcNumber>;
}

impl ToOclcNumber for OclcNumber {
    fn to_oclc_number(&self) -> Result<OclcNumber> {
        Ok(*self)
    }
}

impl ToOclcNumber for str {
    fn to_oclc_number(&self) -> Result<OclcNumber> {
        self.parse()
    }
}

impl ToOclcNumber for String {
    fn to_oclc_number(&self) -> Result<OclcNumber> {
        self.parse()
    }
}

impl ToOclcNumber for u64 {
    fn to_oclc_number(&self) -> Result<OclcNumber> {
        OclcNumber::new(*self)
    }
}

impl ToOclcNumber for u32 {
    fn to_oclc_number(&self) -> Result<OclcNumber> {
        OclcNumber::new(u64::from(*self))
    }
}

impl ToOclcNumber for i64 {
    fn to_oclc_number(&self) -> Result<OclcNumber> {
        let value = u64::try_from(*self).map_err(|_| {
            Error::invalid_oclc_number(format!("{self} is not a positive OCLC #"))
        })?;
        OclcNumber::new(value)
    }
}

impl ToOclcNumber for i32 {
    fn to_oclc_number(&self) -> Result<OclcNumber> {
        i64::from(*self).to_oclc_number()
    }
}

impl<T: ToOclcNumber + ?Sized> ToOclcNumber for &T {
    fn to_oclc_number(&self) -> Result<OclcNumber> {
        (**self).to_oclc_number()
    }
}

/// Conversion into a non-empty batch of [`OclcNumber`]s
///
/// Strings are treated as comma-separated lists.
pub trait ToOclcNumbers {
    fn to_oclc_numbers(&self) -> Result<Vec<OclcNumber>>;
}

impl ToOclcNumbers for str {
    fn to_oclc_numbers(&self) -> Result<Vec<OclcNumber>> {
        let parts: Vec<&str> = self.split(',').map(str::trim).collect();
        collect_batch(&parts)
    }
}

impl ToOclcNumbers for String {
    fn to_oclc_numbers(&self) -> Result<Vec<OclcNumber>> {
        self.as_str().to_oclc_numbers()
    }
}

impl<T: ToOclcNumber> ToOclcNumbers for [T] {
    fn to_oclc_numbers(&self) -> Result<Vec<OclcNumber>> {
        collect_batch(self)
    }
}

impl<T: ToOclcNumber> ToOclcNumbers for Vec<T> {
    fn to_oclc_numbers(&self) -> Result<Vec<OclcNumber>> {
        collect_batch(self)
    }
}

impl<T: ToOclcNumber, const N: usize> ToOclcNumbers for [T; N] {
    fn to_oclc_numbers(&self) -> Result<Vec<OclcNumber>> {
        collect_batch(self)
    }
}

impl<T: ToOclcNumbers + ?Sized> ToOclcNumbers for &T {
    fn to_oclc_numbers(&self) -> Result<Vec<OclcNumber>> {
        (**self).to_oclc_numbers()
    }
}

fn collect_batch<T: ToOclcNumber>(items: &[T]) -> Result<Vec<OclcNumber>> {
    if items.is_empty() {
        return Err(Error::invalid_oclc_number(
            "expected a list or comma separated string of valid OCLC #s",
        ));
    }
    items
        .iter()
        .map(ToOclcNumber::to_oclc_number)
        .collect::<Result<Vec<_>>>()
        .map_err(|e| Error::invalid_oclc_number(format!("one of passed OCLC #s is invalid: {e}")))
}

/// Normalize one identifier
pub fn verify_oclc_number<T: ToOclcNumber + ?Sized>(value: &T) -> Result<OclcNumber> {
    value.to_oclc_number()
}

/// Normalize a batch of identifiers
pub fn verify_oclc_numbers<T: ToOclcNumbers + ?Sized>(values: &T) -> Result<Vec<OclcNumber>> {
    values.to_oclc_numbers()
}

/// Split numbers into comma-joined chunks of at most `size` numbers
pub fn split_into_batches(numbers: &[OclcNumber], size: usize) -> Vec<String> {
    let size = size.clamp(1, MAX_BATCH_SIZE);
    numbers
        .chunks(size)
        .map(|chunk| {
            chunk
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect()
}
