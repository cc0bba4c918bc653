use veil_engine::coords::Rect;

use crate::element::{Display, Element};

/// Upper bound on the inline geometry hint, in logical pixels.
pub const MAX_HINT: f32 = 400.0;

/// Renderer size hint for inline elements.
///
/// Inline content is painted per line fragment, so the renderer gets a tile
/// size derived from the tallest line: twice its height, capped at
/// [`MAX_HINT`]. A size of 0 means "no override".
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GeometryHint {
    pub size: f32,
}

impl GeometryHint {
    pub const NONE: GeometryHint = GeometryHint { size: 0.0 };

    pub fn from_fragments(fragments: &[Rect]) -> Self {
        let tallest = fragments
            .iter()
            .map(|r| r.height())
            .filter(|h| h.is_finite())
            .fold(0.0_f32, f32::max);

        Self { size: (tallest * 2.0).min(MAX_HINT) }
    }

    /// Reads the element's layout; non-inline elements get no hint.
    pub fn measure<E>(element: &E) -> Self
    where
        E: Element + ?Sized,
    {
        if element.display() != Display::Inline {
            return Self::NONE;
        }
        Self::from_fragments(&element.fragments())
    }

    #[inline]
    pub fn is_override(self) -> bool {
        self.size > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::MemoryElement;

    #[test]
    fn tallest_line_doubled() {
        let hint = GeometryHint::from_fragments(&[
            Rect::new(0.0, 0.0, 200.0, 18.0),
            Rect::new(0.0, 18.0, 120.0, 24.0),
        ]);
        assert_eq!(hint.size, 48.0);
        assert!(hint.is_override());
    }

    #[test]
    fn capped_at_400() {
        let hint = GeometryHint::from_fragments(&[Rect::new(0.0, 0.0, 10.0, 300.0)]);
        assert_eq!(hint.size, MAX_HINT);
    }

    #[test]
    fn no_fragments_is_no_override() {
        let hint = GeometryHint::from_fragments(&[]);
        assert_eq!(hint, GeometryHint::NONE);
        assert!(!hint.is_override());
    }

    #[test]
    fn block_elements_get_no_hint() {
        let el = MemoryElement::new(Display::Block).fragment(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(GeometryHint::measure(&el), GeometryHint::NONE);

        let el = MemoryElement::new(Display::Inline).fragment(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(GeometryHint::measure(&el).size, 100.0);
    }
}
