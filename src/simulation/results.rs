// src/simulation/results.rs
use crate::core::{Result, WalkError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fixed-width measurement outcome.
///
/// Bit 0 is the rightmost printed character, so `Bitstring { value: 1, width: 2 }`
/// prints as `01`. Carrying the width explicitly avoids any ambiguity between
/// keys such as `1` and `01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bitstring {
    value: u64,
    width: usize,
}

impl Bitstring {
    /// Creates a bitstring, rejecting values that do not fit in `width` bits.
    pub fn new(value: u64, width: usize) -> Result<Self> {
        if width > 64 || (width < 64 && value >> width != 0) {
            return Err(WalkError::malformed(format!(
                "value {} does not fit in {} bits",
                value, width
            )));
        }
        Ok(Self { value, width })
    }

    /// Unsigned value of the bits.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Value of output bit `bit`.
    pub fn bit(&self, bit: usize) -> bool {
        bit < self.width && (self.value >> bit) & 1 == 1
    }

    /// Interprets the bits as a two's-complement integer on the cyclic
    /// position space, so the upper half of the encodings maps to negative
    /// positions.
    pub fn signed_position(&self) -> i64 {
        if self.width == 0 {
            return 0;
        }
        let half = 1u128 << (self.width - 1);
        let value = u128::from(self.value);
        if value >= half {
            (value as i128 - (half << 1) as i128) as i64
        } else {
            value as i64
        }
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        write!(f, "{:0width$b}", self.value, width = self.width)
    }
}

impl FromStr for Bitstring {
    type Err = WalkError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() > 64 || !s.chars().all(|c| c == '0' || c == '1') {
            return Err(WalkError::malformed(format!("'{}' is not a bitstring", s)));
        }
        let value = if s.is_empty() {
            0
        } else {
            u64::from_str_radix(s, 2).map_err(|e| WalkError::malformed(e.to_string()))?
        };
        Bitstring::new(value, s.len())
    }
}

/// Histogram of measured outcomes from one or more shot batches.
///
/// The running total never exceeds `u64::MAX`; additions that would push it
/// past are rejected, which also keeps every single count in range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OutcomeCounts {
    width: usize,
    counts: BTreeMap<u64, u64>,
    #[serde(skip)]
    total: u64,
}

impl OutcomeCounts {
    /// Creates an empty table for outcomes of `width` bits.
    pub fn new(width: usize) -> Self {
        Self { width, counts: BTreeMap::new(), total: 0 }
    }

    /// Builds a table from `(value, count)` pairs; repeated values accumulate.
    pub fn from_pairs<I>(width: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut counts = Self::new(width);
        for (value, count) in pairs {
            counts.record_n(value, count)?;
        }
        Ok(counts)
    }

    /// Records `n` occurrences of `value`.
    ///
    /// # Errors
    /// [`WalkError::MalformedCounts`] if `value` is wider than the table or
    /// the total would overflow.
    pub fn record_n(&mut self, value: u64, n: u64) -> Result<()> {
        Bitstring::new(value, self.width)?;
        if n == 0 {
            return Ok(());
        }
        self.total = checked_total(self.total, n)?;
        // bounded by the total checked above
        *self.counts.entry(value).or_insert(0) += n;
        Ok(())
    }

    /// Width of every key.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Count recorded for `value`; values never observed count as 0.
    pub fn get(&self, value: u64) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Count recorded for `bits`; a width mismatch counts as 0.
    pub fn get_bits(&self, bits: &Bitstring) -> u64 {
        if bits.width() != self.width {
            return 0;
        }
        self.get(bits.value())
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Observed outcomes in ascending unsigned order.
    pub fn iter(&self) -> impl Iterator<Item = (Bitstring, u64)> + '_ {
        let width = self.width;
        self.counts.iter().map(move |(&value, &count)| (Bitstring { value, width }, count))
    }

    /// Adds every count of `other` into `self`, key by key.
    pub fn merge(&mut self, other: &OutcomeCounts) -> Result<()> {
        if other.width != self.width {
            return Err(WalkError::WidthMismatch { expected: self.width, actual: other.width });
        }
        self.total = checked_total(self.total, other.total)?;
        for (&value, &count) in &other.counts {
            *self.counts.entry(value).or_insert(0) += count;
        }
        Ok(())
    }

    /// Checks the backend contract: fixed key width and a total equal to the
    /// number of shots requested.
    pub fn validate(&self, width: usize, shots: u64) -> Result<()> {
        if self.width != width {
            return Err(WalkError::WidthMismatch { expected: width, actual: self.width });
        }
        let total = self.total();
        if total != shots {
            return Err(WalkError::malformed(format!(
                "counts sum to {} but {} shots were requested",
                total, shots
            )));
        }
        Ok(())
    }
}

fn checked_total(total: u64, extra: u64) -> Result<u64> {
    total
        .checked_add(extra)
        .ok_or_else(|| WalkError::malformed(format!("count total overflows: {} + {}", total, extra)))
}

impl fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (bits, count)) in self.iter().enumerate() {
            write!(f, "{}'{}': {}", if i > 0 { ", " } else { "" }, bits, count)?;
        }
        write!(f, "}}")
    }
}
