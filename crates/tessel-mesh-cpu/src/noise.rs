/// Source of the scalar field used to perturb vertex heights.
///
/// Values are expected in roughly `[-1, 1]` and must be a pure function of the sample point:
/// corners shared between faces (and between chunks) rely on getting the same value back.
pub trait NoiseProvider: Send + Sync {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32;
}

impl<F> NoiseProvider for F
where
    F: Fn(f32, f32, f32) -> f32 + Send + Sync,
{
    #[inline]
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self(x, y, z)
    }
}
