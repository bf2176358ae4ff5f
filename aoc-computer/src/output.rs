//! Rendering of emitted values

use itertools::Itertools;
use std::fmt;

/// The values emitted by `out` instructions, each in `0..=7`
///
/// Displays as comma-joined decimal digits, e.g. `4,6,3,5,6,3,5,2,1,0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Output(Vec<u8>);

impl Output {
    pub fn values(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Output {
    fn from(values: Vec<u8>) -> Self {
        Self(values)
    }
}

impl From<&[u8]> for Output {
    fn from(values: &[u8]) -> Self {
        Self(values.to_vec())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.iter().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let output = Output::from(vec![4, 6, 3, 5, 6, 3, 5, 2, 1, 0]);
        assert_eq!(output.to_string(), "4,6,3,5,6,3,5,2,1,0");
        assert_eq!(Output::from(vec![7]).to_string(), "7");
        assert_eq!(Output::default().to_string(), "");
        assert_eq!(Output::from(&[3, 0][..]).values(), &[3, 0]);
    }
}
