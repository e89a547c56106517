/// All errors that can occur while manipulating a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The header has no line storage allocated.
    HeaderIsNull,
    /// Keyword not found, line number out of range, or a value that could
    /// not be parsed as the requested type.
    Generic,
    /// A line could not be inserted, usually because the header is full.
    HeaderInsertion,
    /// Header blocks ended before an END record was found.
    UnexpectedEof,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::HeaderIsNull => write!(f, "header is not allocated"),
            Error::Generic => write!(f, "header operation failed"),
            Error::HeaderInsertion => write!(f, "failed to insert line into header"),
            Error::UnexpectedEof => write!(f, "unexpected end of header data"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(Error::HeaderIsNull.to_string(), "header is not allocated");
        assert_eq!(
            Error::HeaderInsertion.to_string(),
            "failed to insert line into header"
        );
        assert_eq!(Error::Generic.to_string(), "header operation failed");
        assert_eq!(
            Error::UnexpectedEof.to_string(),
            "unexpected end of header data"
        );
    }

    #[test]
    fn errors_compare_by_kind() {
        assert_eq!(Error::Generic, Error::Generic);
        assert_ne!(Error::Generic, Error::HeaderIsNull);
    }
}
