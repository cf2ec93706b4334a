pub mod pattern;
pub mod record;

pub use pattern::ClipPattern;
pub use record::ClipRecord;

use core::marker::PhantomData;
use std::fmt;

pub trait BBoxFormat: std::fmt::Debug {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Ltwh;
impl BBoxFormat for Ltwh {}

/// Integer pixel rectangle. Coordinates are never negative: clip names may
/// encode negative offsets for clips that overhang the image border, those
/// are floored at zero when the box is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BBox<F: BBoxFormat>([u32; 4], PhantomData<F>);

impl BBox<Ltwh> {
    #[inline]
    pub fn ltwh(x1: u32, x2: u32, x3: u32, x4: u32) -> Self {
        BBox(
            [x1, x2, x3, x4],
            Default::default(),
        )
    }

    #[inline(always)]
    pub fn left(&self) -> u32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> u32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.0[3]
    }
}

/// Haar rectangle form: `x y w h`.
impl fmt::Display for BBox<Ltwh> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.left(), self.top(), self.width(), self.height())
    }
}
