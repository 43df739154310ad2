// src/aggregate/distribution.rs
use crate::core::{Result, WalkError};
use crate::simulation::{Bitstring, OutcomeCounts};
use serde::Serialize;
use std::fmt;

/// Probability of one position on the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionProbability {
    /// Signed position (two's complement of `bits`).
    pub position: i64,
    /// Raw measured encoding.
    pub bits: Bitstring,
    pub probability: f64,
}

/// Normalised position distribution over every `2^width` encoding, ordered
/// by signed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    width: usize,
    entries: Vec<PositionProbability>,
}

impl Distribution {
    /// Normalises `counts` by `denominator` (shots × completed iterations).
    ///
    /// Encodings absent from `counts` get probability 0.
    pub fn from_counts(counts: &OutcomeCounts, denominator: u64) -> Result<Self> {
        if denominator == 0 {
            return Err(WalkError::malformed("cannot normalise over zero shots"));
        }
        let width = counts.width();
        if width >= usize::BITS as usize {
            return Err(WalkError::malformed(format!("{} bits cannot be enumerated", width)));
        }
        let mut entries = (0..1u64 << width)
            .map(|value| {
                let bits = Bitstring::new(value, width)?;
                Ok(PositionProbability {
                    position: bits.signed_position(),
                    bits,
                    probability: counts.get(value) as f64 / denominator as f64,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.position);
        Ok(Self { width, entries })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn entries(&self) -> &[PositionProbability] {
        &self.entries
    }

    /// `(position, probability)` pairs in position order.
    pub fn points(&self) -> Vec<(i64, f64)> {
        self.entries.iter().map(|e| (e.position, e.probability)).collect()
    }

    /// Total probability mass.
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    /// Probability of `position`; positions outside the cycle give 0.
    pub fn probability_of(&self, position: i64) -> f64 {
        self.entries
            .binary_search_by_key(&position, |e| e.position)
            .map(|i| self.entries[i].probability)
            .unwrap_or(0.0)
    }

    /// Position with the highest probability (lowest position on ties).
    pub fn mode(&self) -> Option<i64> {
        self.entries
            .iter()
            .fold(None::<&PositionProbability>, |best, e| match best {
                Some(b) if b.probability >= e.probability => Some(b),
                _ => Some(e),
            })
            .map(|e| e.position)
    }

    /// JSON rendering of the entries.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| WalkError::malformed(e.to_string()))
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits_width = self.width.max(4);
        writeln!(f, "{:>8}  {:>bw$}  {:>11}", "position", "bits", "probability", bw = bits_width)?;
        for e in &self.entries {
            writeln!(f, "{:>8}  {:>bw$}  {:>11.6}", e.position, e.bits.to_string(), e.probability, bw = bits_width)?;
        }
        Ok(())
    }
}
