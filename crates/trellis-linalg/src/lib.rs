//! A small, generic linear algebra library.
//!
//! # Overview
//!
//! - [`Vector`] and [`Matrix`] are fixed-size, stack-allocated types whose dimensions are given
//!   via const generics. Matrices are stored column-major and unpadded.
//! - [`Quat`] represents rotations in 3D space.
//! - The [`shape`] module contains simple N-dimensional shapes ([`shape::Sphere`],
//!   [`shape::Aabb`], [`shape::Plane`], [`shape::Ray`], [`shape::Segment`]) and pairwise
//!   intersection tests between them.
//! - The [`trig`] module provides cheap approximations of the trigonometric functions.
//! - The [`approx`] module implements approximate equality and the [`assert_approx_eq!`] family
//!   of macros, which are used throughout the tests.
//!
//! # Goals & Non-Goals
//!
//! - Don't support dynamically-sized vectors and matrices. The API can be significantly
//!   simplified by relying on const generics to specify vector and matrix dimensions.
//! - Support only a single, column-major, unpadded data layout for matrices and vectors.
//! - Be generic over the element type, but don't try to support non-[`Copy`] numeric types (eg.
//!   "big decimals").
//! - Integer and floating-point element types are both supported. Operations whose behavior
//!   depends on the domain (eg. deciding whether a matrix is singular) branch on
//!   [`Scalar::IS_FLOAT`] at compile time.

pub mod approx;
pub mod shape;
pub mod trig;

mod matrix;
mod quat;
mod traits;
mod vector;

pub use matrix::*;
pub use quat::*;
pub use traits::*;
pub use vector::*;
