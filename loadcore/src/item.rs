use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Nominal dimensions of an item, before any rotation is applied.
///
/// Rotation-invariant quantities (volume, the box a group of same-sized
/// items forms) are always computed from this, never from an
/// already-rotated [`Size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub l: Num,
    pub w: Num,
    pub h: Num,
}

impl Size {
    pub fn new(l: Num, w: Num, h: Num) -> Self {
        Self { l, w, h }
    }

    #[inline(always)]
    pub fn volume(&self) -> Num {
        self.l * self.w * self.h
    }

    /// Applies a canonical axis permutation, indexed exactly as the
    /// orientation table: 0=(l,w,h), 1=(l,h,w), 2=(w,l,h), 3=(w,h,l),
    /// 4=(h,l,w), 5=(h,w,l).
    #[inline(always)]
    pub fn permute(&self, idx: u8) -> Size {
        let (l, w, h) = (self.l, self.w, self.h);
        match idx {
            0 => Size::new(l, w, h),
            1 => Size::new(l, h, w),
            2 => Size::new(w, l, h),
            3 => Size::new(w, h, l),
            4 => Size::new(h, l, w),
            5 => Size::new(h, w, l),
            _ => panic!("Bad orientation index."),
        }
    }

    #[inline(always)]
    pub fn fits_within(&self, other: Size) -> bool {
        self.l <= other.l && self.w <= other.w && self.h <= other.h
    }
}

/// An item's rotation policy and the orientations it allows, in the
/// fixed canonical order defined by the orientation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    None,
    Z,
    Free,
}

impl RotationPolicy {
    /// Orientation indices this policy allows, in canonical order.
    #[inline(always)]
    pub fn allowed_indices(&self) -> &'static [u8] {
        match self {
            RotationPolicy::None => &[0],
            RotationPolicy::Z => &[0, 2],
            RotationPolicy::Free => &[0, 1, 2, 3, 4, 5],
        }
    }

    #[inline(always)]
    pub fn orientations(&self, nominal: Size) -> Vec<(u8, Size)> {
        self.allowed_indices()
            .iter()
            .map(|&idx| (idx, nominal.permute(idx)))
            .collect()
    }
}

/// A single piece of freight. Called `Item` rather than `Box` to avoid
/// shadowing `std::boxed::Box`.
///
/// Items are immutable after ingest and are addressed by their position
/// in the owning `Vec<Item>`, never by [`Item::id`] — `id` may repeat
/// across the input and is a label only (see [`crate::ingest`]).
#[derive(Debug, Clone)]
pub struct Item {
    pub id: i64,
    pub size: Size,
    pub weight: Num,
    pub rotation: RotationPolicy,
    pub group: Option<i64>,
}

impl Item {
    #[inline(always)]
    pub fn volume(&self) -> Num {
        self.size.volume()
    }

    #[inline(always)]
    pub fn orientations(&self) -> Vec<(u8, Size)> {
        self.rotation.orientations(self.size)
    }

    /// `true` iff at least one allowed orientation fits within the
    /// given container interior. Used to pre-screen the "item too big
    /// for the container under any rotation" boundary case before
    /// either phase touches the solver.
    #[inline(always)]
    pub fn can_fit_in(&self, container: Size) -> bool {
        self.orientations().iter().any(|(_, s)| s.fits_within(container))
    }
}
