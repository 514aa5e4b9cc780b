//! Named-field access (`v.x`, `v.y`, ...) for vectors with up to 4 elements.

use std::ops::{Deref, DerefMut};

use crate::Vector;

/// Fields of a 1-element [`Vector`].
#[repr(C)]
pub struct X<T> {
    pub x: T,
    _priv: (), // prevent external construction
}

/// Fields of a 2-element [`Vector`].
#[repr(C)]
pub struct XY<T> {
    pub x: T,
    pub y: T,
    _priv: (),
}

/// Fields of a 3-element [`Vector`].
#[repr(C)]
pub struct XYZ<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    _priv: (),
}

/// Fields of a 4-element [`Vector`].
#[repr(C)]
pub struct XYZW<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
    _priv: (),
}

macro_rules! field_view {
    ($($n:literal => $view:ident),+) => {
        $(
            impl<T> Deref for Vector<T, $n> {
                type Target = $view<T>;

                #[inline]
                fn deref(&self) -> &Self::Target {
                    // Safety: `Vector` is a transparent `[T; N]`, which has the same layout as a
                    // `#[repr(C)]` struct with `N` fields of type `T` (plus a ZST).
                    unsafe { &*(self as *const Self).cast::<$view<T>>() }
                }
            }

            impl<T> DerefMut for Vector<T, $n> {
                #[inline]
                fn deref_mut(&mut self) -> &mut Self::Target {
                    unsafe { &mut *(self as *mut Self).cast::<$view<T>>() }
                }
            }
        )+
    };
}
field_view!(1 => X, 2 => XY, 3 => XYZ, 4 => XYZW);
