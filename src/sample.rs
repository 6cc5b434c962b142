/// A scalar voxel value that can be widened to `f64` without loss.
pub trait Sample: Copy + Send + Sync + 'static {
    fn to_f64(self) -> f64;

    /// Whether this value marks a voxel as part of a mask
    #[inline]
    fn is_foreground(self) -> bool {
        self.to_f64() > 0.0
    }
}

macro_rules! impl_sample {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    f64::from(self)
                }
            }
        )*
    };
}

impl_sample!(u8, u16, u32, i8, i16, i32, f32, f64);
