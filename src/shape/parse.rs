//! `x,y,z` coordinate text parsing.

use glam::Vec3;

/// Parse one position per line, `x,y,z`, decimal, no header.
///
/// Blank lines are skipped so a trailing newline does not add an instance.
/// Anything else that is not exactly three finite numbers is an error;
/// a malformed line never turns into a NaN coordinate.
///
/// # Errors
///
/// Returns a message naming the 1-based line number and its content.
pub fn parse_coordinates(text: &str) -> Result<Vec<Vec3>, String> {
    let mut positions = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let position = parse_line(line)
            .map_err(|reason| format!("line {}: {reason} ('{line}')", idx + 1))?;
        positions.push(position);
    }
    Ok(positions)
}

fn parse_line(line: &str) -> Result<Vec3, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [x, y, z] = fields.as_slice() else {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    };
    Ok(Vec3::new(parse_field(x)?, parse_field(y)?, parse_field(z)?))
}

fn parse_field(field: &str) -> Result<f32, String> {
    let value: f32 = field
        .parse()
        .map_err(|_| format!("'{field}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{field}' is not finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_in_order() {
        let positions =
            parse_coordinates("0,0,0\n1.5,-2,3e-1\n 4 , 5 , 6 \n").unwrap();
        assert_eq!(
            positions,
            vec![
                Vec3::ZERO,
                Vec3::new(1.5, -2.0, 0.3),
                Vec3::new(4.0, 5.0, 6.0),
            ]
        );
    }

    #[test]
    fn skips_blank_lines_and_crlf() {
        let positions = parse_coordinates("1,2,3\r\n\r\n4,5,6\r\n").unwrap();
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn two_fields_is_an_error() {
        let err = parse_coordinates("0,0,0\n1,2\n").unwrap_err();
        assert!(err.starts_with("line 2"), "{err}");
        assert!(err.contains("expected 3 fields"), "{err}");
    }

    #[test]
    fn four_fields_is_an_error() {
        assert!(parse_coordinates("1,2,3,4").is_err());
    }

    #[test]
    fn non_numeric_and_non_finite_fields_are_errors() {
        assert!(parse_coordinates("1,x,3").is_err());
        assert!(parse_coordinates("1,,3").is_err());
        assert!(parse_coordinates("NaN,0,0").is_err());
        assert!(parse_coordinates("inf,0,0").is_err());
    }

    #[test]
    fn empty_text_has_no_positions() {
        assert!(parse_coordinates("").unwrap().is_empty());
    }
}
