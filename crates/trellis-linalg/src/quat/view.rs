use std::ops::{Deref, DerefMut};

use crate::Quat;

/// Components of a [`Quat`]: the imaginary parts `i`, `j`, `k` and the real part `w`.
#[repr(C)]
pub struct IJKW<T> {
    pub i: T,
    pub j: T,
    pub k: T,
    pub w: T,
    _priv: (),
}

impl<T> Deref for Quat<T> {
    type Target = IJKW<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // Safety: `Quat` wraps a `[T; 4]`, laid out like `IJKW` (whose trailing ZST takes no space).
        unsafe { &*(self as *const Self).cast::<IJKW<T>>() }
    }
}

impl<T> DerefMut for Quat<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *(self as *mut Self).cast::<IJKW<T>>() }
    }
}
