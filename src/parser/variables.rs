//! `Variables` block extraction.

use super::ParseError;

/// Extracts the key/value pairs of the `Variables` block.
///
/// The block starts after the line whose trimmed text is `Variables` and
/// ends at the first blank line (or end of input). Each line is split on
/// its first whitespace run; the value keeps its unit, e.g. `12.5 mm`.
/// Pairs come back in file order. A repeated key keeps its first position
/// and takes the later value. Without a `Variables` line the result is
/// empty.
pub fn extract_variables(lines: &[&str]) -> Result<Vec<(String, String)>, ParseError> {
    let start = match lines.iter().position(|l| l.trim() == "Variables") {
        Some(pos) => pos + 1,
        None => return Ok(Vec::new()),
    };

    let mut pairs: Vec<(String, String)> = Vec::new();

    for (offset, line) in lines[start..].iter().enumerate() {
        let text = line.trim();
        if text.is_empty() {
            break;
        }

        let (key, value) = text
            .split_once(char::is_whitespace)
            .map(|(k, v)| (k, v.trim_start()))
            .filter(|(_, v)| !v.is_empty())
            .ok_or_else(|| ParseError::MalformedVariable {
                line: start + offset + 1,
                text: text.to_string(),
            })?;

        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => pairs.push((key.to_string(), value.to_string())),
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_between_marker_and_blank_line() {
        let lines = [
            "EVOMECT150NanoTestDataFile",
            "Variables",
            "SpecimenName B_4_IS",
            "SpecimenDiameter 0.991 um",
            "StrainRate   1.000e-02 1/s",
            "",
            "Ignored after blank 1",
        ];

        let pairs = extract_variables(&lines).unwrap();

        assert_eq!(
            pairs,
            vec![
                ("SpecimenName".to_string(), "B_4_IS".to_string()),
                ("SpecimenDiameter".to_string(), "0.991 um".to_string()),
                ("StrainRate".to_string(), "1.000e-02 1/s".to_string()),
            ]
        );
    }

    #[test]
    fn test_runs_to_end_without_blank_line() {
        let lines = ["Variables", "Modulus 9.581 GPa"];
        let pairs = extract_variables(&lines).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, "9.581 GPa");
    }

    #[test]
    fn test_no_variables_section() {
        let lines = ["Channel Data", "", "\"Stress\""];
        assert!(extract_variables(&lines).unwrap().is_empty());
    }

    #[test]
    fn test_line_without_whitespace_is_fatal() {
        let lines = ["Header", "Variables", "SpecimenName"];
        let err = extract_variables(&lines).unwrap_err();
        assert!(matches!(err, ParseError::MalformedVariable { line: 3, .. }));
    }

    #[test]
    fn test_repeated_key_keeps_first_position() {
        let lines = ["Variables", "A 1 mm", "B 2 mm", "A 3 mm", ""];
        let pairs = extract_variables(&lines).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "3 mm".to_string()),
                ("B".to_string(), "2 mm".to_string()),
            ]
        );
    }
}
