use std::io::{BufRead, BufReader, Read};

use regex::Regex;

use super::{Board, BoardError};

/// Parses a board-file: first line `<rows>x<cols>`, then `rows*cols` non-empty,
/// whitespace-free card tokens in row-major order, one per line. Mirrors the
/// teacher's `notation.rs` style (a dedicated parse function per grammar, `Regex`
/// for the structured header, explicit `_validate_*`-flavoured checks) rather than
/// a `FromStr` impl, since this reads from an arbitrary `Read` source (a file, or an
/// in-memory `&str` in tests) rather than a single owned string.
pub fn parse_board(source: impl Read) -> Result<Board, BoardError> {
    let mut lines = BufReader::new(source).lines();

    let header = lines
        .next()
        .ok_or_else(|| BoardError::MalformedBoard("empty board file".into()))?
        .map_err(|e| BoardError::MalformedBoard(e.to_string()))?;
    let (rows, cols) = parse_header(&header)?;

    let mut pictures = Vec::with_capacity(rows * cols);
    for line in lines {
        let line = line.map_err(|e| BoardError::MalformedBoard(e.to_string()))?;
        if line.is_empty() {
            return Err(BoardError::MalformedBoard("blank lines between tokens are not allowed".into()));
        }
        validate_token(&line)?;
        pictures.push(line);
    }

    if pictures.len() != rows * cols {
        return Err(BoardError::MalformedBoard(format!(
            "expected {} tokens ({rows}x{cols}), found {}",
            rows * cols,
            pictures.len()
        )));
    }

    Ok(Board::new(rows, cols, pictures))
}

fn parse_header(header: &str) -> Result<(usize, usize), BoardError> {
    let pattern = Regex::new(r"^([0-9]+)x([0-9]+)$").unwrap();
    let captures = pattern
        .captures(header.trim())
        .ok_or_else(|| BoardError::MalformedBoard(format!("malformed header {header:?}, expected <rows>x<cols>")))?;

    let rows = captures[1].parse::<usize>().map_err(|e| BoardError::MalformedBoard(e.to_string()))?;
    let cols = captures[2].parse::<usize>().map_err(|e| BoardError::MalformedBoard(e.to_string()))?;

    if rows == 0 || cols == 0 {
        return Err(BoardError::MalformedBoard(format!("rows and cols must be positive, got {rows}x{cols}")));
    }
    Ok((rows, cols))
}

fn validate_token(token: &str) -> Result<(), BoardError> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(BoardError::MalformedBoard(format!("card token {token:?} must be non-empty and whitespace-free")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_board() {
        let b = parse_board("1x3\nA\nA\nB\n".as_bytes()).unwrap();
        assert_eq!(b.num_rows(), 1);
        assert_eq!(b.num_cols(), 3);
        assert_eq!(b.picture_at(0, 0).unwrap().as_deref(), Some("A"));
        assert_eq!(b.picture_at(0, 2).unwrap().as_deref(), Some("B"));
    }

    #[test]
    fn parses_a_multi_row_board() {
        let b = parse_board("2x2\nA\nB\nB\nA\n".as_bytes()).unwrap();
        assert_eq!(b.picture_at(1, 1).unwrap().as_deref(), Some("A"));
    }

    #[test]
    fn rejects_malformed_headers() {
        for header in ["aa", "3x", "x3", "0x2", "-1x2", "3 x 3"] {
            let src = format!("{header}\nA\n");
            assert!(parse_board(src.as_bytes()).is_err(), "expected {header:?} to be rejected");
        }
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert!(parse_board("1x3\nA\nB\n".as_bytes()).is_err());
        assert!(parse_board("1x3\nA\nB\nC\nD\n".as_bytes()).is_err());
    }

    #[test]
    fn rejects_blank_and_whitespace_tokens() {
        assert!(parse_board("1x2\nA\n\n".as_bytes()).is_err());
        assert!(parse_board("1x2\nA\nB C\n".as_bytes()).is_err());
        assert!(parse_board("1x2\nA\n \n".as_bytes()).is_err());
    }

    #[test]
    fn rejects_an_empty_source() {
        assert!(parse_board("".as_bytes()).is_err());
    }
}
