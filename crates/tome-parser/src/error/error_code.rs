//! Error codes for the Tome diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Model building errors
//! - `E2xx` - Reference resolution errors
//! - `E3xx` - Location errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Model Building (E1xx)
    // =========================================================================
    /// Missing include file.
    ///
    /// A configured include file could not be read.
    E100,

    /// Undocumented declaration.
    ///
    /// A published declaration has no documentation. Only reported when
    /// undocumented reporting is enabled.
    E101,

    /// Duplicate declaration.
    ///
    /// Two declarations produced the same identity; the later one is dropped.
    E102,

    /// Unknown package in include file.
    ///
    /// An include file has a `# Package` section for a package that has no
    /// declarations.
    E103,

    /// Unknown tag subject.
    ///
    /// A `@param` or `@property` tag names something the declaration does
    /// not have.
    E104,

    // =========================================================================
    // Reference Resolution (E2xx)
    // =========================================================================
    /// Unresolved reference.
    ///
    /// A documentation link or a signature type names no entity in scope and
    /// no external symbol.
    E200,

    /// Ambiguous reference.
    ///
    /// A link names several overloads and no signature selects one.
    E201,

    // =========================================================================
    // Location (E3xx)
    // =========================================================================
    /// Location collision.
    ///
    /// Two published entities would be written to the same output path.
    E300,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E200").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Model building
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            // Reference resolution
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            // Location
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "missing include file",
            ErrorCode::E101 => "undocumented declaration",
            ErrorCode::E102 => "duplicate declaration",
            ErrorCode::E103 => "unknown package in include file",
            ErrorCode::E104 => "unknown tag subject",
            ErrorCode::E200 => "unresolved reference",
            ErrorCode::E201 => "ambiguous reference",
            ErrorCode::E300 => "location collision",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
        assert_eq!(ErrorCode::E300.to_string(), "E300");
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::E104.as_str(), "E104");
        assert_eq!(ErrorCode::E201.as_str(), "E201");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E100.description(), "missing include file");
        assert_eq!(ErrorCode::E200.description(), "unresolved reference");
        assert_eq!(ErrorCode::E300.description(), "location collision");
    }
}
