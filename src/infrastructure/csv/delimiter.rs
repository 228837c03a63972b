// ============================================================
// DELIMITER DETECTION
// ============================================================
// Pick the candidate that splits sampled lines most consistently

use std::collections::HashMap;

use csv::ReaderBuilder;

/// Detect the delimiter of decoded text from an ordered candidate list.
///
/// Each candidate parses the first `sample_lines` lines (quote-aware) and
/// is scored by the frequency of its modal field count. Highest frequency
/// wins; ties break toward the higher field count, then candidate order.
/// When no candidate ever splits a line (zero lines, single-column files)
/// the first candidate is the fallback.
pub fn detect_delimiter(text: &str, candidates: &[u8], sample_lines: usize) -> u8 {
    let sample: Vec<&str> = text.lines().take(sample_lines).collect();
    let sample = sample.join("\n");

    let mut best: Option<(usize, usize, u8)> = None;
    for &candidate in candidates {
        let Some((freq, modal_len)) = score(&sample, candidate) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_freq, best_len, _)) => {
                freq > best_freq || (freq == best_freq && modal_len > best_len)
            }
        };
        if better {
            best = Some((freq, modal_len, candidate));
        }
    }
    best.map(|(_, _, candidate)| candidate)
        .unwrap_or_else(|| candidates.first().copied().unwrap_or(b','))
}

/// Frequency and value of the modal field count under one candidate.
///
/// A modal count of 1 disqualifies the candidate: a character that never
/// appears splits every line into exactly one field and would otherwise
/// out-score the real delimiter on ragged input.
fn score(sample: &str, delimiter: u8) -> Option<(usize, usize)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample.as_bytes());

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for record in reader.records().flatten() {
        if record.len() > 0 {
            *counts.entry(record.len()).or_insert(0) += 1;
        }
    }
    let (len, freq) = counts
        .into_iter()
        // Deterministic mode: prefer frequency, then the larger field count
        .max_by_key(|&(len, freq)| (freq, len))?;
    if len < 2 {
        return None;
    }
    Some((freq, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: &[u8] = &[b',', b';', b'|', b'\t'];

    #[test]
    fn test_detects_known_delimiters() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3\n", CANDIDATES, 20), b',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3\n", CANDIDATES, 20), b';');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3\n", CANDIDATES, 20), b'|');
        assert_eq!(detect_delimiter("a\tb\n1\t2\n", CANDIDATES, 20), b'\t');
    }

    #[test]
    fn test_consistency_beats_raw_count() {
        // Semicolons split every line the same way; the stray commas do not
        let text = "x;y;z\n1,5;2;3\n4;5,5;6\n7;8;9\n";
        assert_eq!(detect_delimiter(text, CANDIDATES, 20), b';');
    }

    #[test]
    fn test_quoted_delimiters_do_not_count() {
        let text = "name,notes\n\"Smith, John\",ok\n\"Doe, Jane\",fine\n";
        assert_eq!(detect_delimiter(text, CANDIDATES, 20), b',');
    }

    #[test]
    fn test_ragged_rows_keep_the_real_delimiter() {
        // Field counts 3/2/4 never repeat, yet an absent candidate must not
        // win by splitting every line into one field
        assert_eq!(detect_delimiter("a,b,c\n1,2\n3,4,5,6\n", CANDIDATES, 20), b',');
    }

    #[test]
    fn test_empty_text_defaults_to_first_candidate() {
        assert_eq!(detect_delimiter("", CANDIDATES, 20), b',');
        assert_eq!(detect_delimiter("", &[b';', b','], 20), b';');
    }

    #[test]
    fn test_single_column_file_defaults_to_first_candidate() {
        assert_eq!(detect_delimiter("alpha\nbeta\ngamma\n", CANDIDATES, 20), b',');
    }
}
