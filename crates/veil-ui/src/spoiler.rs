use veil_engine::time::{FrameHandle, FrameHost, FrameOutcome, PacingClock, TimeSink};

use crate::element::Element;
use crate::environment::Environment;
use crate::geometry::GeometryHint;
use crate::options::SpoilerOptions;

/// Marker added once when a controller binds to an element.
pub const BASE_MARKER: &str = "spoiler";
/// Marker present while the content is obscured.
pub const HIDDEN_MARKER: &str = "hidden";

/// Published logical time, seconds with millisecond precision.
pub const TIME_PROPERTY: &str = "--t";
pub const MIMIC_WORDS_PROPERTY: &str = "--mimic-words";
pub const DENSITY_PROPERTY: &str = "--density";
pub const GAP_PROPERTY: &str = "--gap";
/// Inline geometry hint in px; absent when there is no override.
pub const HINT_PROPERTY: &str = "--hint-size";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Visibility {
    Hidden,
    Revealed,
}

/// Publishes clock values into the element's `--t` property.
struct PublishTo<'a, E: Element>(&'a mut E);

impl<E: Element> TimeSink for PublishTo<'_, E> {
    fn publish(&mut self, t: f64) {
        self.0.set_property(TIME_PROPERTY, &format_time(t));
    }
}

#[inline]
fn format_time(t: f64) -> String {
    format!("{t:.3}")
}

/// Hide/reveal lifecycle for one element.
///
/// While hidden, a [`PacingClock`] publishes `--t` so the renderer can animate
/// the overlay; revealing stops the clock. The logical time carries over from
/// one hidden period to the next.
///
/// All operations that touch frame registrations take the host explicitly.
/// Frames served by the host are routed back through [`on_host_frame`].
///
/// A controller holds a frame registration while hidden. Call [`dispose`] to
/// release it before dropping the controller.
///
/// # Example
/// ```rust,ignore
/// let mut host = ManualFrameHost::new(0.0);
/// let mut spoiler = SpoilerController::new(element, SpoilerOptions::default(), Environment::default(), &mut host);
///
/// for handle in host.begin_frame(16.7) {
///     spoiler.on_host_frame(handle, 16.7, &mut host);
/// }
///
/// spoiler.reveal(&mut host);
/// ```
///
/// [`on_host_frame`]: SpoilerController::on_host_frame
/// [`dispose`]: SpoilerController::dispose
#[derive(Debug)]
pub struct SpoilerController<E: Element> {
    element: E,
    options: SpoilerOptions,
    env: Environment,
    visibility: Visibility,
    clock: PacingClock,
    hint: GeometryHint,
}

impl<E: Element> SpoilerController<E> {
    /// Binds to `element`, applies `options` and starts hidden.
    pub fn new<H>(element: E, options: SpoilerOptions, env: Environment, host: &mut H) -> Self
    where
        H: FrameHost + ?Sized,
    {
        let mut this = Self {
            element,
            options,
            env,
            visibility: Visibility::Revealed,
            clock: PacingClock::new(0.0),
            hint: GeometryHint::NONE,
        };

        this.element.add_marker(BASE_MARKER);
        this.update(options, host);
        this.hide(host);
        this
    }

    /// Re-applies configuration without changing visibility.
    ///
    /// The reduced-motion preference is the snapshot taken at construction.
    pub fn update<H>(&mut self, options: SpoilerOptions, host: &mut H)
    where
        H: FrameHost + ?Sized,
    {
        self.options = options;

        let fps = self.env.effective_fps(options.resolved_fps());
        self.clock.set_max_rate(fps, host);
        log::debug!("spoiler updated: effective fps {fps}");

        self.forward_hints();
        self.apply_geometry_hint();

        // A suppressed clock never re-registers; lifting the cap while hidden
        // has to start it again.
        if self.visibility == Visibility::Hidden
            && !self.clock.is_running()
            && self.clock.max_rate() > 0.0
        {
            self.start_clock(host);
        }
    }

    /// Obscures the content and (re)starts the clock.
    ///
    /// Calling this while already hidden restarts timing from now.
    pub fn hide<H>(&mut self, host: &mut H)
    where
        H: FrameHost + ?Sized,
    {
        self.element.add_marker(HIDDEN_MARKER);
        self.visibility = Visibility::Hidden;
        log::debug!("spoiler hidden at t={:.3}", self.clock.t());
        self.start_clock(host);
    }

    /// Stops the clock and uncovers the content. No-op when already revealed.
    pub fn reveal<H>(&mut self, host: &mut H)
    where
        H: FrameHost + ?Sized,
    {
        if self.visibility == Visibility::Revealed {
            return;
        }

        self.clock.stop(host);
        self.element.remove_marker(HIDDEN_MARKER);
        self.visibility = Visibility::Revealed;
        log::debug!("spoiler revealed at t={:.3}", self.clock.t());
    }

    /// Routes a served frame registration to the clock.
    ///
    /// Handles this controller does not currently hold yield
    /// [`FrameOutcome::Stale`] and change nothing.
    pub fn on_host_frame<H>(&mut self, handle: FrameHandle, host_time: f64, host: &mut H) -> FrameOutcome
    where
        H: FrameHost + ?Sized,
    {
        let mut sink = PublishTo(&mut self.element);
        self.clock.on_host_frame(handle, host_time, host, &mut sink)
    }

    /// Stops the clock and hands the element back.
    pub fn dispose<H>(mut self, host: &mut H) -> E
    where
        H: FrameHost + ?Sized,
    {
        self.clock.stop(host);
        self.element
    }

    #[inline]
    pub fn owns(&self, handle: FrameHandle) -> bool {
        self.clock.handle() == Some(handle)
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.visibility == Visibility::Revealed
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.clock.is_running()
    }

    /// Current logical time in seconds.
    #[inline]
    pub fn t(&self) -> f64 {
        self.clock.t()
    }

    #[inline]
    pub fn effective_fps(&self) -> f64 {
        self.clock.max_rate()
    }

    #[inline]
    pub fn options(&self) -> &SpoilerOptions {
        &self.options
    }

    #[inline]
    pub fn geometry_hint(&self) -> GeometryHint {
        self.hint
    }

    #[inline]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Mutable access for layout changes. Markers and properties owned by the
    /// controller should not be edited through this.
    #[inline]
    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    fn start_clock<H>(&mut self, host: &mut H)
    where
        H: FrameHost + ?Sized,
    {
        let now = host.now();
        let mut sink = PublishTo(&mut self.element);
        self.clock.start(now, host, &mut sink);
    }

    fn forward_hints(&mut self) {
        match self.options.mimic_words {
            Some(on) => self.element.set_property(MIMIC_WORDS_PROPERTY, if on { "1" } else { "0" }),
            None => self.element.remove_property(MIMIC_WORDS_PROPERTY),
        }
        match self.options.density {
            Some(density) => self.element.set_property(DENSITY_PROPERTY, &density.to_string()),
            None => self.element.remove_property(DENSITY_PROPERTY),
        }
        match self.options.gap {
            Some(gap) => self.element.set_property(GAP_PROPERTY, &format!("{gap}px")),
            None => self.element.remove_property(GAP_PROPERTY),
        }
    }

    fn apply_geometry_hint(&mut self) {
        self.hint = GeometryHint::measure(&self.element);
        if self.hint.is_override() {
            self.element.set_property(HINT_PROPERTY, &format!("{}px", self.hint.size));
        } else {
            self.element.remove_property(HINT_PROPERTY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Display, MemoryElement};
    use veil_engine::coords::Rect;
    use veil_engine::time::ManualFrameHost;

    fn block() -> MemoryElement {
        MemoryElement::new(Display::Block).fragment(Rect::new(0.0, 0.0, 300.0, 40.0))
    }

    fn spoiler(host: &mut ManualFrameHost, fps: f64) -> SpoilerController<MemoryElement> {
        let options = SpoilerOptions::default().fps(fps);
        SpoilerController::new(block(), options, Environment::default(), host)
    }

    /// Serves one refresh at `now` and routes every due handle to `s`.
    fn frame<E: Element>(s: &mut SpoilerController<E>, host: &mut ManualFrameHost, now: f64) -> Vec<FrameOutcome> {
        host.begin_frame(now)
            .into_iter()
            .map(|h| s.on_host_frame(h, now, host))
            .collect()
    }

    fn published(s: &SpoilerController<MemoryElement>) -> Option<&str> {
        s.element().property(TIME_PROPERTY)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn starts_hidden_and_animating() {
        let mut host = ManualFrameHost::new(100.0);
        let s = spoiler(&mut host, 24.0);

        assert_eq!(s.visibility(), Visibility::Hidden);
        assert!(!s.is_revealed());
        assert!(s.is_animating());
        assert!(s.element().has_marker(BASE_MARKER));
        assert!(s.element().has_marker(HIDDEN_MARKER));
        assert_eq!(published(&s), Some("0.000"));
        assert_eq!(host.pending(), 1);
    }

    #[test]
    fn default_options_cap_at_24() {
        let mut host = ManualFrameHost::new(0.0);
        let s = SpoilerController::new(block(), SpoilerOptions::default(), Environment::default(), &mut host);
        assert_eq!(s.effective_fps(), 24.0);
    }

    #[test]
    fn negative_fps_behaves_as_suppressed() {
        let mut host = ManualFrameHost::new(0.0);
        let s = spoiler(&mut host, -10.0);
        assert_eq!(s.effective_fps(), 0.0);
        assert!(!s.is_animating());
        assert_eq!(host.pending(), 0);
    }

    // ── pacing ────────────────────────────────────────────────────────────

    #[test]
    fn publishes_t_with_millisecond_precision() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 24.0);

        assert_eq!(frame(&mut s, &mut host, 10.0), vec![FrameOutcome::Skipped]);
        assert_eq!(published(&s), Some("0.000"));

        frame(&mut s, &mut host, 1234.5678);
        assert_eq!(published(&s), Some("1.235"));
    }

    #[test]
    fn frames_for_other_handles_are_stale() {
        let mut host = ManualFrameHost::new(0.0);
        let mut a = spoiler(&mut host, 24.0);
        let mut b = spoiler(&mut host, 24.0);

        let due = host.begin_frame(100.0);
        assert_eq!(due.len(), 2);
        let (ha, hb) = (due[0], due[1]);
        assert!(a.owns(ha) && b.owns(hb));

        assert_eq!(a.on_host_frame(hb, 100.0, &mut host), FrameOutcome::Stale);
        assert!(a.on_host_frame(ha, 100.0, &mut host).is_advanced());
        assert!(b.on_host_frame(hb, 100.0, &mut host).is_advanced());
        assert_eq!(host.pending(), 2);
    }

    // ── reduced motion ────────────────────────────────────────────────────

    #[test]
    fn reduced_motion_publishes_baseline_and_idles() {
        let mut host = ManualFrameHost::new(50.0);
        let mut s = SpoilerController::new(block(), SpoilerOptions::default(), Environment::new(true), &mut host);

        assert_eq!(published(&s), Some("0.000"));
        assert_eq!(s.effective_fps(), 0.0);
        assert!(!s.is_animating());
        assert!(!s.is_revealed());
        assert!(frame(&mut s, &mut host, 1000.0).is_empty());
    }

    #[test]
    fn reduced_motion_hide_publishes_t_once() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = SpoilerController::new(block(), SpoilerOptions::default(), Environment::new(true), &mut host);
        s.reveal(&mut host);
        s.element_mut().remove_property(TIME_PROPERTY);
        let before = s.element().mutations();

        s.hide(&mut host);

        // Hidden marker plus the one `--t` write.
        assert_eq!(published(&s), Some("0.000"));
        assert_eq!(s.element().mutations(), before + 2);
        assert_eq!(host.pending(), 0);
        assert!(!s.is_animating());
        assert!(frame(&mut s, &mut host, 1000.0).is_empty());
        assert_eq!(published(&s), Some("0.000"));
    }

    #[test]
    fn update_cannot_override_reduced_motion() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = SpoilerController::new(block(), SpoilerOptions::default(), Environment::new(true), &mut host);
        s.update(SpoilerOptions::default().fps(60.0), &mut host);
        assert_eq!(s.effective_fps(), 0.0);
        assert!(!s.is_animating());
    }

    // ── reveal / hide ─────────────────────────────────────────────────────

    #[test]
    fn reveal_stops_clock_and_clears_marker() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 24.0);

        s.reveal(&mut host);

        assert!(s.is_revealed());
        assert!(!s.is_animating());
        assert!(!s.element().has_marker(HIDDEN_MARKER));
        assert!(s.element().has_marker(BASE_MARKER));
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn reveal_twice_is_a_no_op() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 24.0);

        s.reveal(&mut host);
        let mutations = s.element().mutations();
        s.reveal(&mut host);

        assert!(s.is_revealed());
        assert!(!s.is_animating());
        assert_eq!(s.element().mutations(), mutations);
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn stale_frame_after_reveal_publishes_nothing() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 24.0);
        let due = host.begin_frame(0.0);

        s.reveal(&mut host);
        let mutations = s.element().mutations();

        assert_eq!(s.on_host_frame(due[0], 500.0, &mut host), FrameOutcome::Stale);
        assert_eq!(s.element().mutations(), mutations);
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn hide_reveal_hide_resumes_logical_time() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 24.0);

        frame(&mut s, &mut host, 400.0);
        s.reveal(&mut host);
        let at_reveal = s.t();
        assert!((at_reveal - 0.4).abs() < 1e-9);

        host.set_now(5_000.0);
        s.hide(&mut host);
        assert!(s.is_animating());
        assert!(s.t() >= at_reveal);
        assert_eq!(published(&s), Some("0.400"));

        frame(&mut s, &mut host, 5_100.0);
        assert!((s.t() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hide_while_hidden_restarts_without_leaking() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 24.0);

        host.set_now(30.0);
        s.hide(&mut host);
        s.hide(&mut host);

        assert_eq!(host.pending(), 1);
        assert!(s.is_animating());
        assert_eq!(s.visibility(), Visibility::Hidden);
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn update_keeps_visibility() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 24.0);
        s.reveal(&mut host);

        s.update(SpoilerOptions::default().fps(60.0), &mut host);

        assert!(s.is_revealed());
        assert!(!s.is_animating());
        assert_eq!(s.effective_fps(), 60.0);
    }

    #[test]
    fn update_to_zero_fps_cancels_registration() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 24.0);

        s.update(SpoilerOptions::default().fps(0.0), &mut host);

        assert!(!s.is_animating());
        assert_eq!(host.pending(), 0);
        assert!(!s.is_revealed());
    }

    #[test]
    fn update_lifting_cap_while_hidden_resumes_animation() {
        let mut host = ManualFrameHost::new(0.0);
        let mut s = spoiler(&mut host, 0.0);
        assert!(!s.is_animating());

        s.update(SpoilerOptions::default().fps(24.0), &mut host);

        assert!(s.is_animating());
        assert_eq!(host.pending(), 1);
    }

    #[test]
    fn update_forwards_renderer_hints() {
        let mut host = ManualFrameHost::new(0.0);
        let options = SpoilerOptions::default().mimic_words(true).density(0.5).gap(6.0);
        let mut s = SpoilerController::new(block(), options, Environment::default(), &mut host);

        assert_eq!(s.element().property(MIMIC_WORDS_PROPERTY), Some("1"));
        assert_eq!(s.element().property(DENSITY_PROPERTY), Some("0.5"));
        assert_eq!(s.element().property(GAP_PROPERTY), Some("6px"));

        s.update(SpoilerOptions::default(), &mut host);
        assert_eq!(s.element().property(MIMIC_WORDS_PROPERTY), None);
        assert_eq!(s.element().property(DENSITY_PROPERTY), None);
        assert_eq!(s.element().property(GAP_PROPERTY), None);
    }

    #[test]
    fn inline_elements_get_geometry_hint() {
        let mut host = ManualFrameHost::new(0.0);
        let el = MemoryElement::new(Display::Inline)
            .fragment(Rect::new(40.0, 0.0, 260.0, 20.0))
            .fragment(Rect::new(0.0, 20.0, 100.0, 22.0));
        let mut s = SpoilerController::new(el, SpoilerOptions::default(), Environment::default(), &mut host);

        assert_eq!(s.geometry_hint().size, 44.0);
        assert_eq!(s.element().property(HINT_PROPERTY), Some("44px"));

        // Re-laid out as a block: the hint is withdrawn on the next update.
        s.element_mut().set_display(Display::Block);
        s.update(SpoilerOptions::default(), &mut host);
        assert_eq!(s.geometry_hint(), GeometryHint::NONE);
        assert_eq!(s.element().property(HINT_PROPERTY), None);
    }

    #[test]
    fn relayout_updates_hint_without_touching_pacing() {
        let mut host = ManualFrameHost::new(0.0);
        let el = MemoryElement::new(Display::Inline).fragment(Rect::new(0.0, 0.0, 80.0, 18.0));
        let mut s = SpoilerController::new(el, SpoilerOptions::default(), Environment::default(), &mut host);
        assert_eq!(s.element().property(HINT_PROPERTY), Some("36px"));

        s.element_mut().set_fragments(vec![Rect::new(0.0, 0.0, 80.0, 300.0)]);
        s.update(SpoilerOptions::default(), &mut host);

        assert_eq!(s.geometry_hint().size, 400.0);
        assert_eq!(s.element().property(HINT_PROPERTY), Some("400px"));
        assert!(s.is_animating());
        assert_eq!(host.pending(), 1);
    }

    #[test]
    fn inline_element_without_fragments_has_no_hint() {
        let mut host = ManualFrameHost::new(0.0);
        let el = MemoryElement::new(Display::Inline);
        let s = SpoilerController::new(el, SpoilerOptions::default(), Environment::default(), &mut host);
        assert!(!s.geometry_hint().is_override());
        assert_eq!(s.element().property(HINT_PROPERTY), None);
    }

    // ── ownership ─────────────────────────────────────────────────────────

    #[test]
    fn dispose_releases_registration_and_returns_element() {
        let mut host = ManualFrameHost::new(0.0);
        let s = spoiler(&mut host, 24.0);

        let el = s.dispose(&mut host);

        assert_eq!(host.pending(), 0);
        assert!(el.has_marker(HIDDEN_MARKER));
    }

    #[test]
    fn borrowed_element_stays_with_caller() {
        let mut host = ManualFrameHost::new(0.0);
        let mut el = block();
        {
            let mut s = SpoilerController::new(&mut el, SpoilerOptions::default(), Environment::default(), &mut host);
            frame(&mut s, &mut host, 1000.0);
            s.reveal(&mut host);
        }
        assert_eq!(el.property(TIME_PROPERTY), Some("1.000"));
        assert!(!el.has_marker(HIDDEN_MARKER));
    }
}
