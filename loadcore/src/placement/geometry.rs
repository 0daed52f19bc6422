//! Geometric primitives shared by the extreme-point construction
//! heuristic and the soft-objective evaluation in [`super`]: interval
//! overlap, pairwise box overlap, the no-floating support relation, and
//! candidate corner generation.
//!
//! The corner-point idea (track the frontier of already-placed boxes as
//! a small set of candidate insertion points rather than scanning the
//! whole interior) is the same shape as an extreme-point/empty-maximal-
//! space bin-packer; this module is a from-scratch version of that
//! idea scaled down to exactly what one container's worth of boxes
//! needs.

use crate::prelude::*;

/// A box that has already been given an orientation and a corner.
#[derive(Debug, Clone, Copy)]
pub struct Placed {
    pub pos: (Num, Num, Num),
    pub size: Size,
    pub orient_idx: u8,
}

impl Placed {
    #[inline(always)]
    pub fn far(&self) -> (Num, Num, Num) {
        (self.pos.0 + self.size.l, self.pos.1 + self.size.w, self.pos.2 + self.size.h)
    }

    #[inline(always)]
    pub fn base_area(&self) -> Num {
        self.size.l * self.size.w
    }

    #[inline(always)]
    pub fn fits_in_bounds(&self, container: Size) -> bool {
        let far = self.far();
        self.pos.0 >= 0
            && self.pos.1 >= 0
            && self.pos.2 >= 0
            && far.0 <= container.l
            && far.1 <= container.w
            && far.2 <= container.h
    }
}

/// Strict one-dimensional overlap: `true` iff the open intervals
/// `(a0,a1)` and `(b0,b1)` share more than a single point.
#[inline(always)]
fn intervals_overlap_strict(a0: Num, a1: Num, b0: Num, b1: Num) -> bool {
    a0 < b1 && b0 < a1
}

#[inline(always)]
fn interval_overlap_length(a0: Num, a1: Num, b0: Num, b1: Num) -> Num {
    (a1.min(b1) - a0.max(b0)).max(0)
}

/// `true` iff two placed boxes share interior volume (violates §8
/// invariant 3 if so — used only to *check* candidate placements, the
/// construction heuristic never emits an overlapping pair).
pub fn boxes_overlap(a: &Placed, b: &Placed) -> bool {
    let (ax0, ay0, az0) = a.pos;
    let (ax1, ay1, az1) = a.far();
    let (bx0, by0, bz0) = b.pos;
    let (bx1, by1, bz1) = b.far();
    intervals_overlap_strict(ax0, ax1, bx0, bx1)
        && intervals_overlap_strict(ay0, ay1, by0, by1)
        && intervals_overlap_strict(az0, az1, bz0, bz1)
}

/// `true` iff `s`'s top face is flush with `i`'s bottom face and their
/// X-Y projections overlap strictly — the no-floating support relation
/// from §4.2 / §8 invariant 5.
pub fn supports(i: &Placed, s: &Placed) -> bool {
    if s.far().2 != i.pos.2 {
        return false;
    }
    intervals_overlap_strict(i.pos.0, i.far().0, s.pos.0, s.far().0)
        && intervals_overlap_strict(i.pos.1, i.far().1, s.pos.1, s.far().1)
}

/// X-Y projection overlap area between two flush-contacting boxes, the
/// surface-contact soft term's per-pair contribution.
pub fn xy_overlap_area(a: &Placed, b: &Placed) -> Num {
    let ox = interval_overlap_length(a.pos.0, a.far().0, b.pos.0, b.far().0);
    let oy = interval_overlap_length(a.pos.1, a.far().1, b.pos.1, b.far().1);
    ox * oy
}

/// Candidate corner points for the next box to try, derived from the
/// container origin plus the far corners (in each axis) of every box
/// already placed. A point is kept only if it does not already fall
/// strictly inside some placed box.
pub fn candidate_corners(placed: &[Placed]) -> Vec<(Num, Num, Num)> {
    let mut xs = vec![0];
    let mut ys = vec![0];
    let mut zs = vec![0];
    for p in placed {
        let far = p.far();
        xs.push(far.0);
        ys.push(far.1);
        zs.push(far.2);
    }
    xs.sort_unstable();
    xs.dedup();
    ys.sort_unstable();
    ys.dedup();
    zs.sort_unstable();
    zs.dedup();

    let mut out = Vec::with_capacity(xs.len() * ys.len() * zs.len());
    for &z in &zs {
        for &y in &ys {
            for &x in &xs {
                let probe = (x, y, z);
                if !placed.iter().any(|p| point_strictly_inside(probe, p)) {
                    out.push(probe);
                }
            }
        }
    }
    out
}

#[inline(always)]
fn point_strictly_inside(p: (Num, Num, Num), b: &Placed) -> bool {
    let far = b.far();
    p.0 > b.pos.0 && p.0 < far.0 && p.1 > b.pos.1 && p.1 < far.1 && p.2 > b.pos.2 && p.2 < far.2
}

/// `true` iff placing `candidate` at `pos` with size `size` neither
/// overlaps any already-placed box nor leaves the container, i.e. it is
/// a legal corner to commit to.
pub fn candidate_is_legal(pos: (Num, Num, Num), size: Size, container: Size, placed: &[Placed]) -> bool {
    let probe = Placed { pos, size, orient_idx: 0 };
    probe.fits_in_bounds(container) && placed.iter().all(|p| !boxes_overlap(&probe, p))
}

/// `true` iff `probe` rests on the floor or atop some box in `placed`.
pub fn has_support(probe: &Placed, placed: &[Placed]) -> bool {
    probe.pos.2 == 0 || placed.iter().any(|p| supports(probe, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = Placed { pos: (0, 0, 0), size: Size::new(2, 2, 2), orient_idx: 0 };
        let b = Placed { pos: (2, 0, 0), size: Size::new(2, 2, 2), orient_idx: 0 };
        assert!(!boxes_overlap(&a, &b));
    }

    #[test]
    fn overlapping_boxes_detected() {
        let a = Placed { pos: (0, 0, 0), size: Size::new(2, 2, 2), orient_idx: 0 };
        let b = Placed { pos: (1, 1, 1), size: Size::new(2, 2, 2), orient_idx: 0 };
        assert!(boxes_overlap(&a, &b));
    }

    #[test]
    fn flush_stack_is_supported() {
        let base = Placed { pos: (0, 0, 0), size: Size::new(10, 10, 1), orient_idx: 0 };
        let top = Placed { pos: (1, 1, 1), size: Size::new(5, 5, 1), orient_idx: 0 };
        assert!(supports(&top, &base));
        assert!(has_support(&top, &[base]));
    }

    #[test]
    fn floating_box_has_no_support() {
        let base = Placed { pos: (0, 0, 0), size: Size::new(10, 10, 1), orient_idx: 0 };
        let floating = Placed { pos: (0, 0, 5), size: Size::new(5, 5, 1), orient_idx: 0 };
        assert!(!has_support(&floating, &[base]));
    }
}
