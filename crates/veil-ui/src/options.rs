/// Frame cap used when `fps` is not given.
pub const DEFAULT_FPS: f64 = 24.0;

/// Spoiler configuration.
///
/// All fields are optional. Only `fps` affects pacing; the others are hints
/// forwarded verbatim to the renderer through presentation properties.
///
/// ```rust,ignore
/// let options = SpoilerOptions::default().fps(30.0).gap(4.0);
/// ```
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SpoilerOptions {
    /// Maximum logical clock updates per second. Defaults to 24.
    pub fps: Option<f64>,
    /// Ask the renderer to shape particles like words.
    pub mimic_words: Option<bool>,
    /// Overrides the particle density.
    pub density: Option<f64>,
    /// Gap in px inside which no particles spawn.
    pub gap: Option<f64>,
}

impl SpoilerOptions {
    #[inline]
    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    #[inline]
    pub fn mimic_words(mut self, mimic_words: bool) -> Self {
        self.mimic_words = Some(mimic_words);
        self
    }

    #[inline]
    pub fn density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    #[inline]
    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }

    /// The configured cap with defaults applied; negative or NaN clamps to 0.
    pub fn resolved_fps(&self) -> f64 {
        match self.fps {
            None => DEFAULT_FPS,
            Some(fps) if fps > 0.0 => fps,
            Some(_) => 0.0,
        }
    }
}
