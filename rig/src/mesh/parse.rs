//! Line-level parsing of the object-grouped mesh format
//!
//! One directive per line, whitespace separated:
//!
//! ```text
//! v x y z          position
//! vt u v           texture coordinate
//! vn x y z         normal
//! o name           start an object
//! g name           switch group (bare `g` returns to "off")
//! f a/b/c d/e/f g/h/i
//!                  triangle of position/texcoord/normal index triples (1-based)
//! ```
//!
//! Blank lines, `#` comments and unknown directives are skipped.

use glam::{Vec2, Vec3};

use crate::error::MeshError;

/// Group name used before any `g` line
pub const DEFAULT_GROUP: &str = "off";

/// One triangle corner with 0-based pool indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Corner {
    pub position: usize,
    pub tex_coord: usize,
    pub normal: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Directive<'a> {
    Position(Vec3),
    TexCoord(Vec2),
    Normal(Vec3),
    Object(&'a str),
    Group(&'a str),
    Face([Corner; 3]),
    Skip,
}

/// Parse a single source line. `line` is the 1-based line number.
pub(crate) fn parse_line(line: usize, text: &str) -> Result<Directive<'_>, MeshError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(Directive::Skip);
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    let args = &parts[1..];

    match parts[0] {
        "v" => Ok(Directive::Position(parse_vec3(line, "v", args)?)),
        "vn" => Ok(Directive::Normal(parse_vec3(line, "vn", args)?)),
        "vt" => {
            let [u, v] = parse_floats::<2>(line, "vt", args)?;
            Ok(Directive::TexCoord(Vec2::new(u, v)))
        }
        "o" => match args.first() {
            Some(&name) => Ok(Directive::Object(name)),
            None => Err(malformed(line, "'o' requires an object name")),
        },
        "g" => Ok(Directive::Group(args.first().copied().unwrap_or(DEFAULT_GROUP))),
        "f" => parse_face(line, args).map(Directive::Face),
        _ => Ok(Directive::Skip),
    }
}

fn parse_vec3(line: usize, directive: &str, args: &[&str]) -> Result<Vec3, MeshError> {
    let [x, y, z] = parse_floats::<3>(line, directive, args)?;
    Ok(Vec3::new(x, y, z))
}

/// Parse the first `N` arguments as floats; extra arguments are ignored.
fn parse_floats<const N: usize>(
    line: usize,
    directive: &str,
    args: &[&str],
) -> Result<[f32; N], MeshError> {
    if args.len() < N {
        return Err(malformed(
            line,
            format!("'{directive}' needs {N} components, found {}", args.len()),
        ));
    }

    let mut out = [0.0f32; N];
    for (slot, token) in out.iter_mut().zip(args) {
        // `nan` and `inf` parse as f32 but are not coordinates
        *slot = token
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| MeshError::InvalidNumber {
                line,
                token: token.to_string(),
            })?;
    }
    Ok(out)
}

fn parse_face(line: usize, args: &[&str]) -> Result<[Corner; 3], MeshError> {
    if args.len() != 3 {
        return Err(malformed(
            line,
            format!("face must have exactly 3 corners, found {}", args.len()),
        ));
    }

    Ok([
        parse_corner(line, args[0])?,
        parse_corner(line, args[1])?,
        parse_corner(line, args[2])?,
    ])
}

/// Parse a `v/vt/vn` corner. All three indices are required.
fn parse_corner(line: usize, token: &str) -> Result<Corner, MeshError> {
    let fields: Vec<&str> = token.split('/').collect();
    if fields.len() != 3 || fields.iter().any(|f| f.is_empty()) {
        return Err(malformed(
            line,
            format!("face corner '{token}' must be position/texcoord/normal"),
        ));
    }

    Ok(Corner {
        position: parse_index(line, fields[0])?,
        tex_coord: parse_index(line, fields[1])?,
        normal: parse_index(line, fields[2])?,
    })
}

/// Convert a 1-based index to 0-based
fn parse_index(line: usize, token: &str) -> Result<usize, MeshError> {
    let index: usize = token.parse().map_err(|_| MeshError::InvalidNumber {
        line,
        token: token.to_string(),
    })?;
    index
        .checked_sub(1)
        .ok_or_else(|| malformed(line, "face indices are 1-based, found 0"))
}

fn malformed(line: usize, reason: impl Into<String>) -> MeshError {
    MeshError::Malformed {
        line,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes() {
        assert_eq!(
            parse_line(1, "v 1 2.5 -3").unwrap(),
            Directive::Position(Vec3::new(1.0, 2.5, -3.0))
        );
        assert_eq!(
            parse_line(1, "vn 0 1 0").unwrap(),
            Directive::Normal(Vec3::Y)
        );
        // Optional third texture component is ignored
        assert_eq!(
            parse_line(1, "vt 0.25 0.75 0").unwrap(),
            Directive::TexCoord(Vec2::new(0.25, 0.75))
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(parse_line(1, "o person").unwrap(), Directive::Object("person"));
        assert_eq!(parse_line(1, "g left_leg").unwrap(), Directive::Group("left_leg"));
        assert_eq!(parse_line(1, "g").unwrap(), Directive::Group(DEFAULT_GROUP));
        assert!(matches!(
            parse_line(4, "o"),
            Err(MeshError::Malformed { line: 4, .. })
        ));
    }

    #[test]
    fn test_parse_face() {
        let Directive::Face(corners) = parse_line(1, "f 1/2/3 4/5/6 7/8/9").unwrap() else {
            panic!("expected face");
        };
        assert_eq!(
            corners[0],
            Corner {
                position: 0,
                tex_coord: 1,
                normal: 2
            }
        );
        assert_eq!(corners[2].normal, 8);
    }

    #[test]
    fn test_skips_comments_blank_and_unknown() {
        assert_eq!(parse_line(1, "").unwrap(), Directive::Skip);
        assert_eq!(parse_line(1, "   ").unwrap(), Directive::Skip);
        assert_eq!(parse_line(1, "# v 1 2 3").unwrap(), Directive::Skip);
        assert_eq!(parse_line(1, "usemtl skin").unwrap(), Directive::Skip);
        assert_eq!(parse_line(1, "s off").unwrap(), Directive::Skip);
    }

    #[test]
    fn test_face_requires_full_triples() {
        for text in ["f 1//1 2//2 3//3", "f 1 2 3", "f 1/1 2/2 3/3", "f 1/1/1/1 2/2/2 3/3/3"] {
            assert!(
                matches!(parse_line(2, text), Err(MeshError::Malformed { line: 2, .. })),
                "{text} should be malformed"
            );
        }
    }

    #[test]
    fn test_face_requires_three_corners() {
        assert!(matches!(
            parse_line(1, "f 1/1/1 2/2/2 3/3/3 4/4/4"),
            Err(MeshError::Malformed { .. })
        ));
        assert!(matches!(
            parse_line(1, "f 1/1/1 2/2/2"),
            Err(MeshError::Malformed { .. })
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(
            parse_line(3, "v 1 two 3"),
            Err(MeshError::InvalidNumber {
                line: 3,
                token: "two".to_string()
            })
        );
        assert!(matches!(
            parse_line(1, "f -1/1/1 2/2/2 3/3/3"),
            Err(MeshError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_line(1, "f 0/1/1 2/2/2 3/3/3"),
            Err(MeshError::Malformed { .. })
        ));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for (text, token) in [
            ("v nan 0 0", "nan"),
            ("vt inf 0", "inf"),
            ("vn 0 -infinity 1", "-infinity"),
        ] {
            assert_eq!(
                parse_line(2, text),
                Err(MeshError::InvalidNumber {
                    line: 2,
                    token: token.to_string()
                })
            );
        }
    }

    #[test]
    fn test_short_vectors_are_malformed() {
        assert!(matches!(parse_line(1, "v 1 2"), Err(MeshError::Malformed { .. })));
        assert!(matches!(parse_line(1, "vt 1"), Err(MeshError::Malformed { .. })));
        assert!(matches!(parse_line(1, "vn"), Err(MeshError::Malformed { .. })));
    }
}
