//! The whitespace-separated triple-stream dataset format (§6): one triple
//! per line, three whitespace-separated non-negative integers, blank lines
//! and `#`-prefixed comment lines ignored.

use crate::error::{Error, Result};
use crate::ring::Triple;
use std::io::BufRead;

/// Parse every data line of `reader` into a [`Triple`], failing on the
/// first malformed line with its 1-indexed line number.
pub fn read_triples<R: BufRead>(reader: R) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        triples.push(parse_triple_line(line_no, trimmed)?);
    }
    Ok(triples)
}

fn parse_triple_line(line_no: usize, line: &str) -> Result<Triple> {
    let mut fields = line.split_whitespace();
    let s = next_id(line_no, &mut fields)?;
    let p = next_id(line_no, &mut fields)?;
    let o = next_id(line_no, &mut fields)?;
    if fields.next().is_some() {
        return Err(Error::Dataset {
            line: line_no,
            message: "expected exactly three fields".into(),
        });
    }
    Ok((s, p, o))
}

fn next_id<'a>(line_no: usize, fields: &mut impl Iterator<Item = &'a str>) -> Result<usize> {
    let field = fields.next().ok_or_else(|| Error::Dataset {
        line: line_no,
        message: "expected exactly three fields".into(),
    })?;
    field.parse::<usize>().map_err(|_| Error::Dataset {
        line: line_no,
        message: format!("'{field}' is not a non-negative integer"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_well_formed_lines() {
        let input = b"1 2 3\n4 5 6\n";
        let triples = read_triples(&input[..]).unwrap();
        assert_eq!(triples, vec![(1, 2, 3), (4, 5, 6)]);
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        let input = b"# header\n1 2 3\n\n4 5 6\n";
        let triples = read_triples(&input[..]).unwrap();
        assert_eq!(triples, vec![(1, 2, 3), (4, 5, 6)]);
    }

    #[test]
    fn reports_the_offending_line_number() {
        let input = b"1 2 3\nnot a number 2 3\n";
        let err = read_triples(&input[..]).unwrap_err();
        assert!(matches!(err, Error::Dataset { line: 2, .. }));
    }

    #[test]
    fn rejects_wrong_field_count() {
        let input = b"1 2\n";
        let err = read_triples(&input[..]).unwrap_err();
        assert!(matches!(err, Error::Dataset { line: 1, .. }));
    }
}
