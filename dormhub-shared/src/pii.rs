use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A wrapper for sensitive contact data (student phone numbers) that masks its
/// value in Debug output and can be customized for Serialization.
#[derive(Clone, Deserialize, PartialEq)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // In logs we mask, but authorized API responses need the real value.
        // This wrapper is primarily for preventing accidental leakage in log
        // macros like tracing::info!("{:?}", view).
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Masked(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_masked() {
        let phone = Masked("0241234567".to_string());
        assert_eq!(format!("{:?}", phone), "********");
        assert_eq!(format!("{}", phone), "********");
    }

    #[test]
    fn serialization_keeps_real_value() {
        let phone = Masked("0241234567".to_string());
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"0241234567\"");
    }
}
