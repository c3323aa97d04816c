use crate::clusters::record::{ClusterRecord, SIZE_TAG};
use crate::error::{DiversityError, Result};
use std::collections::HashSet;
use std::io::BufRead;

/// A header line paired with the sequence line that follows it.
#[derive(Debug)]
struct RawCluster {
    header_line: usize,
    header: String,
    sequence: String,
}

/// Reads an annotated cluster FASTA. Either every record parses or nothing is
/// returned.
pub fn parse_clusters<R: BufRead>(reader: R) -> Result<Vec<ClusterRecord>> {
    let raw = pair_lines(reader)?;

    let mut seen = HashSet::with_capacity(raw.len());
    let mut records = Vec::with_capacity(raw.len());
    for entry in raw {
        let (name, read_count, percentage) = parse_header(entry.header_line, &entry.header)?;
        if !seen.insert(name.to_string()) {
            return Err(DiversityError::malformed(
                entry.header_line,
                format!("duplicate cluster name '{}'", name),
            ));
        }
        records.push(ClusterRecord::new(
            name,
            entry.sequence,
            percentage,
            read_count,
        ));
    }
    Ok(records)
}

// Blank lines are ignored; anything else must alternate header, sequence.
fn pair_lines<R: BufRead>(reader: R) -> Result<Vec<RawCluster>> {
    let mut entries = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some((header_line, _)) = pending {
                return Err(DiversityError::malformed(
                    header_line,
                    "header is not followed by a sequence line",
                ));
            }
            pending = Some((line_no, header.to_string()));
        } else {
            match pending.take() {
                Some((header_line, header)) => entries.push(RawCluster {
                    header_line,
                    header,
                    sequence: line.to_string(),
                }),
                None => {
                    return Err(DiversityError::malformed(
                        line_no,
                        "sequence line without a preceding header",
                    ))
                }
            }
        }
    }

    if let Some((header_line, _)) = pending {
        return Err(DiversityError::malformed(
            header_line,
            "header is not followed by a sequence line",
        ));
    }
    Ok(entries)
}

/// Splits `name;size=<reads>...<pct>%` into its parts.
pub(crate) fn parse_header(line: usize, header: &str) -> Result<(&str, u64, f64)> {
    let size_at = header
        .find(SIZE_TAG)
        .ok_or_else(|| DiversityError::malformed(line, "missing ';size=' annotation"))?;
    let name = &header[..size_at];
    if name.is_empty() {
        return Err(DiversityError::malformed(line, "empty cluster name"));
    }

    let rest = &header[size_at + SIZE_TAG.len()..];
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return Err(DiversityError::malformed(
            line,
            "';size=' is not followed by a read count",
        ));
    }
    let read_count: u64 = rest[..digits_end]
        .parse()
        .map_err(|e| DiversityError::malformed(line, format!("invalid read count: {}", e)))?;
    if read_count == 0 {
        return Err(DiversityError::malformed(line, "read count must be positive"));
    }

    let body = rest[digits_end..]
        .strip_suffix('%')
        .ok_or_else(|| DiversityError::malformed(line, "missing trailing percentage"))?;
    let start = body
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let percentage_text = &body[start..];
    let percentage: f64 = percentage_text.parse().map_err(|_| {
        DiversityError::malformed(
            line,
            format!("invalid percentage '{}%'", percentage_text),
        )
    })?;
    if !(0.0..=100.0).contains(&percentage) {
        return Err(DiversityError::malformed(
            line,
            format!("percentage {} is outside 0-100", percentage),
        ));
    }

    Ok((name, read_count, percentage))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed_line(err: DiversityError) -> usize {
        match err {
            DiversityError::MalformedRecord { line, .. } => line,
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn parses_usearch_style_headers() {
        let input = ">ReadA;size=180_90.0%\nAAATTTCCCGGG  \n>ReadB;size=20_10.0%\nTTTAAATTTGGG\n";
        let records = parse_clusters(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "ReadA");
        assert_eq!(records[0].sequence, "AAATTTCCCGGG");
        assert_eq!(records[0].read_count, 180);
        assert_eq!(records[0].percentage, 90.0);
        assert_eq!(records[1].name, "ReadB");
        assert_eq!(records[1].percentage, 10.0);
    }

    #[test]
    fn accepts_separator_variants_before_percentage() {
        let (name, reads, pct) = parse_header(1, "Seq7;size=12;5.25%").unwrap();
        assert_eq!((name, reads, pct), ("Seq7", 12, 5.25));

        let (_, _, pct) = parse_header(1, "Seq7;size=12_100%").unwrap();
        assert_eq!(pct, 100.0);
    }

    #[test]
    fn missing_annotations_are_rejected() {
        assert_eq!(malformed_line(parse_header(3, "ReadA_90.0%").unwrap_err()), 3);
        assert_eq!(malformed_line(parse_header(4, "ReadA;size=180").unwrap_err()), 4);
        assert_eq!(malformed_line(parse_header(5, "ReadA;size=_9.0%").unwrap_err()), 5);
        assert_eq!(malformed_line(parse_header(6, "ReadA;size=0_9.0%").unwrap_err()), 6);
        assert_eq!(malformed_line(parse_header(7, ";size=5_9.0%").unwrap_err()), 7);
        assert_eq!(malformed_line(parse_header(8, "ReadA;size=5_120.0%").unwrap_err()), 8);
    }

    #[test]
    fn trailing_header_without_sequence_is_rejected() {
        let input = ">ReadA;size=180_90.0%\nACGT\n>ReadB;size=20_10.0%\n";
        let err = parse_clusters(input.as_bytes()).unwrap_err();
        assert_eq!(malformed_line(err), 3);
    }

    #[test]
    fn consecutive_headers_are_rejected() {
        let input = ">ReadA;size=180_90.0%\n>ReadB;size=20_10.0%\nACGT\n";
        let err = parse_clusters(input.as_bytes()).unwrap_err();
        assert_eq!(malformed_line(err), 1);
    }

    #[test]
    fn orphan_sequence_and_duplicate_names_are_rejected() {
        let err = parse_clusters("ACGT\n".as_bytes()).unwrap_err();
        assert_eq!(malformed_line(err), 1);

        let input = ">A;size=1_50.0%\nAC\n>A;size=1_50.0%\nGT\n";
        let err = parse_clusters(input.as_bytes()).unwrap_err();
        assert_eq!(malformed_line(err), 3);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let input = "\n>A;size=3_75.0%\n\nACGT\n\n>B;size=1_25.0%\nTT\n\n";
        let records = parse_clusters(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence, "ACGT");
    }
}
