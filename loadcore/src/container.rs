use crate::prelude::*;

/// Interior geometry and payload capacity shared by every container
/// instance. There is exactly one of these per run; all instances
/// created by [`crate::assign`] are identical copies of it.
#[derive(Debug, Clone, Copy)]
pub struct ContainerSpec {
    pub l: Num,
    pub w: Num,
    pub h: Num,
    pub weight_max: Num,
}

impl ContainerSpec {
    #[inline(always)]
    pub fn size(&self) -> Size {
        Size::new(self.l, self.w, self.h)
    }

    #[inline(always)]
    pub fn volume(&self) -> Num {
        self.l * self.w * self.h
    }
}
