use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///
/// The two axes of a genotype matrix: individuals are columns, markers are rows.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    Individuals,
    Markers,
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Individuals => write!(f, "individuals"),
            Axis::Markers => write!(f, "markers"),
        }
    }
}
