use crate::error::{DiversityError, Result};
use serde::Serialize;

/// Counted A/C/G/T observations at one position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BaseCounts {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
}

impl BaseCounts {
    /// Counts upper-case `A`, `C`, `G`, `T`; every other symbol is ignored.
    pub fn from_bases(bases: &str) -> Self {
        let mut counts = BaseCounts::default();
        for b in bases.bytes() {
            match b {
                b'A' => counts.a += 1,
                b'C' => counts.c += 1,
                b'G' => counts.g += 1,
                b'T' => counts.t += 1,
                _ => {}
            }
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.a + self.c + self.g + self.t
    }

    /// Counts in ascending order.
    pub fn sorted(&self) -> [u64; 4] {
        let mut counts = [self.a, self.c, self.g, self.t];
        counts.sort_unstable();
        counts
    }

    /// Count of the second most abundant base.
    pub fn second_highest(&self) -> u64 {
        self.sorted()[2]
    }

    /// Number of read pairs carrying different bases.
    pub fn differing_pairs(&self) -> u64 {
        let BaseCounts { a, c, g, t } = *self;
        a * c + a * g + a * t + c * g + c * t + g * t
    }
}

/// Bases stacked at one reference coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionTally {
    pub reference: String,
    /// 1-based coordinate as written in the pileup.
    pub position: u64,
    pub reference_base: char,
    pub depth: u64,
    /// Read bases after markup stripping and match normalization.
    pub bases: String,
    pub counts: BaseCounts,
}

impl PositionTally {
    /// `None` when an indel length in `raw_bases` does not fit in a `usize`.
    pub fn new(
        reference: impl Into<String>,
        position: u64,
        reference_base: char,
        depth: u64,
        raw_bases: &str,
        normalize_matches: bool,
    ) -> Option<Self> {
        let reference_base = reference_base.to_ascii_uppercase();
        let bases = normalize_bases(raw_bases, reference_base, normalize_matches)?;
        let counts = BaseCounts::from_bases(&bases);
        Some(Self {
            reference: reference.into(),
            position,
            reference_base,
            depth,
            bases,
            counts,
        })
    }

    /// Parses one mpileup line: `ref pos ref_base depth bases quals [...]`.
    ///
    /// Match symbols are replaced by the reference base only when the depth
    /// column is at least `min_depth_for_normalization`.
    pub fn from_pileup_line(
        line: &str,
        line_no: usize,
        min_depth_for_normalization: u64,
    ) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 6 {
            return Err(DiversityError::malformed(
                line_no,
                format!("expected at least 6 tab-separated columns, found {}", fields.len()),
            ));
        }

        let position: u64 = fields[1].trim().parse().map_err(|_| {
            DiversityError::malformed(line_no, format!("invalid position '{}'", fields[1]))
        })?;
        let mut ref_chars = fields[2].trim().chars();
        let reference_base = match (ref_chars.next(), ref_chars.next()) {
            (Some(base), None) => base,
            _ => {
                return Err(DiversityError::malformed(
                    line_no,
                    format!("reference base must be one character, found '{}'", fields[2]),
                ))
            }
        };
        let depth: u64 = fields[3].trim().parse().map_err(|_| {
            DiversityError::malformed(line_no, format!("invalid depth '{}'", fields[3]))
        })?;

        Self::new(
            fields[0],
            position,
            reference_base,
            depth,
            fields[4],
            depth >= min_depth_for_normalization,
        )
        .ok_or_else(|| DiversityError::malformed(line_no, "indel length out of range"))
    }

    /// Probability that two reads drawn without replacement carry different
    /// bases. Undefined below two counted bases.
    pub fn pairwise_diversity(&self) -> Result<f64> {
        let n = self.counts.total();
        if n <= 1 {
            return Err(DiversityError::DegeneratePosition {
                reference: self.reference.clone(),
                position: self.position,
                depth: n,
            });
        }
        let pairs = (n * (n - 1) / 2) as f64;
        Ok(self.counts.differing_pairs() as f64 / pairs)
    }
}

/// Strips read-start (`^` + mapping quality), read-end (`$`) and indel
/// (`+N...`/`-N...`) markup, folds to upper case and, if requested, replaces
/// `.`/`,` with `reference_base`. Returns `None` on an indel length that
/// overflows `usize`.
pub fn normalize_bases(raw: &str, reference_base: char, normalize_matches: bool) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '^' => {
                chars.next();
            }
            '$' => {}
            '+' | '-' => {
                let mut len = 0usize;
                while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
                    len = len.checked_mul(10)?.checked_add(digit as usize)?;
                    chars.next();
                }
                for _ in 0..len {
                    chars.next();
                }
            }
            '.' | ',' if normalize_matches => out.push(reference_base),
            other => out.push(other.to_ascii_uppercase()),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_become_reference_base() {
        let tally = PositionTally::new("chr1", 10, 't', 8, "AAAA,,,,", true).unwrap();
        assert_eq!(tally.bases, "AAAATTTT");
        assert_eq!(tally.counts, BaseCounts { a: 4, c: 0, g: 0, t: 4 });
        assert!((tally.pairwise_diversity().unwrap() - 16.0 / 28.0).abs() < 1e-12);
    }

    #[test]
    fn markup_is_stripped() {
        assert_eq!(normalize_bases("^A.^],$a", 'G', true).unwrap(), "GGA");
        assert_eq!(normalize_bases(".+2AC,-1t.", 'C', true).unwrap(), "CCC");
        assert_eq!(normalize_bases("^!A+12ACGTACGTACGTc", 'T', true).unwrap(), "AC");
        assert_eq!(normalize_bases("*g", 'A', true).unwrap(), "*G");
    }

    #[test]
    fn oversized_indel_length_is_rejected() {
        assert_eq!(normalize_bases(".+99999999999999999999999A.", 'A', true), None);
        assert!(PositionTally::new("chr1", 1, 'A', 3, ".-99999999999999999999999A", true).is_none());

        let line = "r\t1\tA\t3\t.+99999999999999999999999A.\tIII";
        match PositionTally::from_pileup_line(line, 12, 0) {
            Err(DiversityError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 12);
                assert!(reason.contains("indel length"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn shallow_positions_keep_raw_match_symbols() {
        assert_eq!(normalize_bases("^F.,a", 'G', false).unwrap(), ".,A");
        let tally = PositionTally::new("chr1", 1, 'G', 3, "^F.,a", false).unwrap();
        assert_eq!(tally.counts.total(), 1);
    }

    #[test]
    fn sorted_counts_and_second_highest() {
        let counts = BaseCounts { a: 9, c: 1, g: 3, t: 0 };
        assert_eq!(counts.sorted(), [0, 1, 3, 9]);
        assert_eq!(counts.second_highest(), 3);
        assert_eq!(counts.differing_pairs(), 9 + 27 + 3);
    }

    #[test]
    fn parses_pileup_line() {
        let tally =
            PositionTally::from_pileup_line("ref\t42\ta\t6\t..,,Gg\tIIIIII", 1, 0).unwrap();
        assert_eq!(tally.reference, "ref");
        assert_eq!(tally.position, 42);
        assert_eq!(tally.reference_base, 'A');
        assert_eq!(tally.depth, 6);
        assert_eq!(tally.counts, BaseCounts { a: 4, c: 0, g: 2, t: 0 });
    }

    #[test]
    fn depth_threshold_controls_normalization() {
        let line = "ref\t1\tC\t3\t..T\tIII";
        let normalized = PositionTally::from_pileup_line(line, 1, 3).unwrap();
        assert_eq!(normalized.counts.total(), 3);
        let raw = PositionTally::from_pileup_line(line, 1, 4).unwrap();
        assert_eq!(raw.bases, "..T");
        assert_eq!(raw.counts.total(), 1);
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for line in [
            "ref\t1\tA\t3\t...",
            "ref\tx\tA\t3\t...\tIII",
            "ref\t1\tAC\t3\t...\tIII",
            "ref\t1\tA\tdeep\t...\tIII",
        ] {
            assert!(matches!(
                PositionTally::from_pileup_line(line, 7, 0),
                Err(DiversityError::MalformedRecord { line: 7, .. })
            ));
        }
    }

    #[test]
    fn single_read_position_is_degenerate() {
        let tally = PositionTally::new("chrM", 5, 'A', 1, ".", true).unwrap();
        assert!(matches!(
            tally.pairwise_diversity(),
            Err(DiversityError::DegeneratePosition { position: 5, depth: 1, .. })
        ));
        let empty = PositionTally::new("chrM", 6, 'A', 0, "*", true).unwrap();
        assert!(empty.pairwise_diversity().is_err());
    }
}
