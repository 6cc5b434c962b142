use std::fmt;

/// The axis held fixed when cutting a 2D slice out of a (Z, Y, X) volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Axis {
    /// Axial: the slice spans (Y, X)
    #[default]
    Z,
    /// Coronal: the slice spans (Z, X)
    Y,
    /// Sagittal: the slice spans (Z, Y)
    X,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Z, Axis::Y, Axis::X];

    /// Position of this axis in the (Z, Y, X) dimension tuple
    pub fn to_usize(self) -> usize {
        match self {
            Axis::Z => 0,
            Axis::Y => 1,
            Axis::X => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Z => write!(f, "z"),
            Axis::Y => write!(f, "y"),
            Axis::X => write!(f, "x"),
        }
    }
}

/// Which intensity bounds map samples into the 8-bit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Volume-wide bounds computed once, so scrubbing never changes contrast
    #[default]
    Global,
    /// Bounds of the slice being rendered
    Local,
}
