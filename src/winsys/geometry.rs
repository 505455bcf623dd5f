use crate::window::Window;

use std::ops::Add;

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Default for Pos {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
        }
    }
}

impl Pos {
    pub fn dist(
        &self,
        pos: Self,
    ) -> Distance {
        Distance {
            dx: (pos.x - self.x),
            dy: (pos.y - self.y),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub struct Dim {
    pub w: i32,
    pub h: i32,
}

impl Dim {
    pub fn with_minimum_dim(
        self,
        minimum_dim: &Dim,
    ) -> Self {
        Self {
            w: std::cmp::max(self.w, minimum_dim.w),
            h: std::cmp::max(self.h, minimum_dim.h),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub struct Region {
    pub pos: Pos,
    pub dim: Dim,
}

impl Region {
    pub fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Self {
        Self {
            pos: Pos {
                x,
                y,
            },
            dim: Dim {
                w,
                h,
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub struct Distance {
    pub dx: i32,
    pub dy: i32,
}

impl Add<Distance> for Pos {
    type Output = Self;

    fn add(
        self,
        dist: Distance,
    ) -> Self::Output {
        Self::Output {
            x: self.x + dist.dx,
            y: self.y + dist.dy,
        }
    }
}

impl Add<Distance> for Dim {
    type Output = Self;

    fn add(
        self,
        dist: Distance,
    ) -> Self::Output {
        Self::Output {
            w: self.w + dist.dx,
            h: self.h + dist.dy,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum StackMode {
    Above,
    Below,
    TopIf,
    BottomIf,
    Opposite,
}

/// A partial configure update; every field left as `None` is left untouched
/// by the server.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WindowChanges {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sibling: Option<Window>,
    pub stack_mode: Option<StackMode>,
}

impl WindowChanges {
    pub fn from_pos(pos: Pos) -> Self {
        Self {
            x: Some(pos.x),
            y: Some(pos.y),
            ..Default::default()
        }
    }

    pub fn from_dim(dim: Dim) -> Self {
        Self {
            width: Some(dim.w as u32),
            height: Some(dim.h as u32),
            ..Default::default()
        }
    }

    pub fn from_sibling(sibling: Window) -> Self {
        Self {
            sibling: Some(sibling),
            ..Default::default()
        }
    }

    pub fn from_stack_mode(stack_mode: StackMode) -> Self {
        Self {
            stack_mode: Some(stack_mode),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
