pub fn cast_to_bool(bit: u8) -> Result<bool, ParserError> {
    match bit {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(ParserError::ErrorVerify),
    }
}

/// Position of `inner` inside `outer`. `inner` must be a subslice of `outer`, as the
/// payloads returned by the layer parsers are.
pub fn offset(outer: &[u8], inner: &[u8]) -> usize {
    inner.as_ptr().addr().saturating_sub(outer.as_ptr().addr())
}

pub enum ParserError {
    ErrorVerify,
    FailureVerify,
}

impl ParserError {
    pub fn to_nom<T>(&self, input: T) -> nom::Err<nom::error::Error<T>> {
        match self {
            Self::ErrorVerify => nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Verify,
            )),
            Self::FailureVerify => nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Verify,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_to_bool() {
        assert!(matches!(cast_to_bool(0), Ok(false)));
        assert!(matches!(cast_to_bool(1), Ok(true)));
        assert!(cast_to_bool(2).is_err());
    }

    #[test]
    fn test_offset() {
        let input = [1u8, 2, 3, 4, 5];
        assert_eq!(offset(&input, &input[3..]), 3);
        assert_eq!(offset(&input, &input[1..2]), 1);
        assert_eq!(offset(&input, &input), 0);
    }
}
