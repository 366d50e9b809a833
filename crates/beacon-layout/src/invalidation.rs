#![forbid(unsafe_code)]

//! Per-frame coalescing of tooltip geometry recomputation.
//!
//! Resize, scroll, tooltip measurement and step changes can arrive many times
//! between two frames. They are folded into one [`Invalidation`] set and the
//! placement is recomputed at most once per [`LayoutScheduler::flush`].
//!
//! # Invariants
//!
//! - **Latest-wins**: a flush computes from the inputs supplied at flush time,
//!   never from inputs captured when the invalidation was recorded.
//! - **No stale steps**: every step change bumps the generation; a cached
//!   placement from an older generation is never returned by
//!   [`LayoutScheduler::current`].
//! - **Idle frames are free**: a flush with nothing pending and a current
//!   cache does not call the compute closure.

use bitflags::bitflags;

use crate::placement::Placed;

bitflags! {
    /// Reasons the tooltip geometry must be recomputed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Invalidation: u8 {
        /// The rendered tooltip reported a new size.
        const TOOLTIP_RESIZE  = 0b0001;
        /// The viewport was resized or rotated.
        const VIEWPORT_RESIZE = 0b0010;
        /// The page scrolled, moving the target.
        const SCROLL          = 0b0100;
        /// The active step changed.
        const STEP_CHANGE     = 0b1000;
    }
}

/// Batches invalidations and caches the last placement per step generation.
#[derive(Debug, Clone, Default)]
pub struct LayoutScheduler {
    pending: Invalidation,
    generation: u64,
    cached: Option<(u64, Option<Placed>)>,
    recomputes: u64,
}

impl LayoutScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a trigger. Cheap; may be called any number of times per frame.
    pub fn invalidate(&mut self, reason: Invalidation) {
        self.pending |= reason;
    }

    /// Record a step change and return the new generation.
    pub fn step_changed(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending |= Invalidation::STEP_CHANGE;
        self.generation
    }

    /// Current step generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Triggers recorded since the last flush.
    #[must_use]
    pub fn pending(&self) -> Invalidation {
        self.pending
    }

    /// True if a flush would recompute.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty() || !self.cache_is_current()
    }

    /// Recompute if anything changed since the last flush, then return the
    /// placement for the current generation. `compute` returns `None` when
    /// there is nothing to place (no active step).
    pub fn flush<F>(&mut self, compute: F) -> Option<Placed>
    where
        F: FnOnce() -> Option<Placed>,
    {
        if self.is_dirty() {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                generation = self.generation,
                reasons = self.pending.bits(),
                "recomputing tooltip geometry"
            );
            self.pending = Invalidation::empty();
            self.recomputes += 1;
            self.cached = Some((self.generation, compute()));
        }
        self.current()
    }

    /// The cached placement, if it belongs to the current generation.
    #[must_use]
    pub fn current(&self) -> Option<Placed> {
        match self.cached {
            Some((generation, placed)) if generation == self.generation => placed,
            _ => None,
        }
    }

    /// Drop the cached placement (e.g. when the tour ends).
    pub fn clear(&mut self) {
        self.cached = None;
        self.pending = Invalidation::empty();
    }

    /// Number of recomputations performed.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    fn cache_is_current(&self) -> bool {
        matches!(self.cached, Some((generation, _)) if generation == self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Side;
    use beacon_core::geometry::Point;

    fn placed_at(x: f64) -> Placed {
        Placed {
            tooltip: Point::new(x, 0.0),
            side: Side::Bottom,
            spotlight: None,
        }
    }

    #[test]
    fn coalesces_many_triggers_into_one_recompute() {
        let mut s = LayoutScheduler::new();
        s.step_changed();
        s.invalidate(Invalidation::SCROLL);
        s.invalidate(Invalidation::SCROLL);
        s.invalidate(Invalidation::VIEWPORT_RESIZE);
        assert_eq!(
            s.pending(),
            Invalidation::SCROLL | Invalidation::VIEWPORT_RESIZE | Invalidation::STEP_CHANGE
        );
        let out = s.flush(|| Some(placed_at(1.0)));
        assert_eq!(out, Some(placed_at(1.0)));
        assert_eq!(s.recompute_count(), 1);
        assert!(!s.is_dirty());
    }

    #[test]
    fn clean_flush_skips_compute() {
        let mut s = LayoutScheduler::new();
        s.flush(|| Some(placed_at(1.0)));
        let out = s.flush(|| panic!("must not recompute"));
        assert_eq!(out, Some(placed_at(1.0)));
        assert_eq!(s.recompute_count(), 1);
    }

    #[test]
    fn flush_uses_latest_inputs() {
        let mut s = LayoutScheduler::new();
        let mut latest = 1.0;
        s.invalidate(Invalidation::SCROLL);
        latest += 41.0;
        let out = s.flush(|| Some(placed_at(latest)));
        assert_eq!(out.map(|p| p.tooltip.x), Some(42.0));
    }

    #[test]
    fn step_change_hides_stale_placement() {
        let mut s = LayoutScheduler::new();
        s.flush(|| Some(placed_at(1.0)));
        s.step_changed();
        assert_eq!(s.current(), None);
        assert!(s.is_dirty());
        let out = s.flush(|| Some(placed_at(2.0)));
        assert_eq!(out, Some(placed_at(2.0)));
    }

    #[test]
    fn empty_result_is_cached_too() {
        let mut s = LayoutScheduler::new();
        assert_eq!(s.flush(|| None), None);
        assert!(!s.is_dirty());
        assert_eq!(s.recompute_count(), 1);
    }

    #[test]
    fn clear_drops_cache() {
        let mut s = LayoutScheduler::new();
        s.flush(|| Some(placed_at(1.0)));
        s.clear();
        assert_eq!(s.current(), None);
    }
}
