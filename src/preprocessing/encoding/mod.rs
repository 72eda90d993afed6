//! Categorical feature encoding transformers.
//!
//! ## OneHotEncoder
//! Converts one categorical column into indicator columns, one per category
//! seen during fitting.
//!
//! ```ignore
//! // Seasons: ["Winter", "Summer", "Winter"]
//! // Output columns: Seasons=Summer, Seasons=Winter
//! // [[0, 1], [1, 0], [0, 1]]
//! ```

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};

use serde::{Deserialize, Serialize};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    Error,
    /// Ignore unknown categories (the indicator group is all zeros).
    #[default]
    Ignore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_unknown_default_is_ignore() {
        assert_eq!(HandleUnknown::default(), HandleUnknown::Ignore);
    }

    #[test]
    fn test_handle_unknown_json_names() {
        assert_eq!(serde_json::to_string(&HandleUnknown::Error).unwrap(), "\"error\"");
        let parsed: HandleUnknown = serde_json::from_str("\"ignore\"").unwrap();
        assert_eq!(parsed, HandleUnknown::Ignore);
    }
}
