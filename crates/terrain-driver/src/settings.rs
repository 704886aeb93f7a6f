//! Typed settings and actions a front end can send to a session.

/// A single configuration change, carrying a value of the right type for
/// the setting it names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    /// Number of upsamples from the base grid on generate.
    SampleDepth(u32),
    /// Replaces one genome value.
    Gene { index: usize, value: f32 },
    /// Mesh extent along the longer grid side.
    WorldSize(f32),
    /// Fixes the random seed and reseeds the session.
    Seed(u64),
}

/// A one-shot request against the current terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Regenerate from the base grid at the configured depth.
    Generate,
    /// One more level of detail, if the mesh would still fit.
    UpSample,
    /// One less level of detail, if both sides are odd.
    DownSample,
    /// Restart the random source from the configured seed, or from entropy.
    Reseed,
    /// Draw a fresh genome from the session's random source.
    RandomizeGenome,
}
