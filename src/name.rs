use crate::error::{Error, NameProblem};

/// No template may ask for more namespace levels than this, whatever its
/// descriptor says.
pub const MAX_DEPTH: usize = 5;

/// Check a proposed output name against a template's expected namespace
/// depth. Depth is the count of `.` separators; `None` accepts any depth up
/// to [`MAX_DEPTH`]. Every dot-separated segment must be an identifier.
pub fn check(expected_depth: Option<usize>, candidate: &str) -> Result<(), Error> {
    let found = candidate.matches('.').count();

    if found > MAX_DEPTH {
        return Err(invalid(candidate, NameProblem::TooDeep { found }));
    }

    if let Some(expected) = expected_depth {
        if found != expected {
            return Err(invalid(candidate, NameProblem::WrongDepth { expected, found }));
        }
    }

    if let Some(segment) = candidate.split('.').find(|s| !is_identifier(s)) {
        return Err(invalid(
            candidate,
            NameProblem::NotAnIdentifier {
                segment: segment.to_owned(),
            },
        ));
    }

    Ok(())
}

fn invalid(name: &str, problem: NameProblem) -> Error {
    Error::InvalidName {
        name: name.to_owned(),
        problem,
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
