use crate::defaults::MIN_WINDOW_DIM;
use crate::defaults::RESIZE_BUTTON;

use winsys::geometry::Dim;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::input::Button;
use winsys::window::Window;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DragKind {
    Move,
    Resize,
}

impl From<Button> for DragKind {
    fn from(button: Button) -> Self {
        if button == RESIZE_BUTTON {
            Self::Resize
        } else {
            Self::Move
        }
    }
}

/// The window held by an interactive pointer grab, along with where the
/// pointer and the window were when the grab began.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Drag {
    kind: DragKind,
    window: Window,
    grip_pos: Pos,
    window_region: Option<Region>,
}

impl Drag {
    pub fn new(
        kind: DragKind,
        window: Window,
        grip_pos: Pos,
        window_region: Option<Region>,
    ) -> Self {
        Self {
            kind,
            window,
            grip_pos,
            window_region,
        }
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn moved_to(
        &self,
        pos: Pos,
    ) -> Option<Pos> {
        self.window_region
            .map(|region| region.pos + self.grip_pos.dist(pos))
    }

    pub fn resized_to(
        &self,
        pos: Pos,
    ) -> Option<Dim> {
        self.window_region.map(|region| {
            (region.dim + self.grip_pos.dist(pos)).with_minimum_dim(&MIN_WINDOW_DIM)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(kind: DragKind) -> Drag {
        Drag::new(
            kind,
            0x0080_0003,
            Pos {
                x: 400,
                y: 300,
            },
            Some(Region::new(100, 50, 640, 480)),
        )
    }

    #[test]
    fn right_button_resizes() {
        assert_eq!(DragKind::from(Button::Right), DragKind::Resize);
        assert_eq!(DragKind::from(Button::Left), DragKind::Move);
        assert_eq!(DragKind::from(Button::Middle), DragKind::Move);
    }

    #[test]
    fn moving_follows_pointer_delta() {
        let pos = drag(DragKind::Move).moved_to(Pos {
            x: 380,
            y: 360,
        });

        assert_eq!(
            pos,
            Some(Pos {
                x: 80,
                y: 110,
            })
        );
    }

    #[test]
    fn resizing_respects_minimum_dim() {
        let dim = drag(DragKind::Resize).resized_to(Pos {
            x: 500,
            y: 320,
        });

        assert_eq!(
            dim,
            Some(Dim {
                w: 740,
                h: 500,
            })
        );

        let dim = drag(DragKind::Resize).resized_to(Pos {
            x: -400,
            y: -200,
        });

        assert_eq!(dim, Some(MIN_WINDOW_DIM));
    }

    #[test]
    fn unknown_region_yields_nothing() {
        let drag = Drag::new(DragKind::Move, 0x0080_0003, Pos::default(), None);

        assert_eq!(drag.moved_to(Pos::default()), None);
        assert_eq!(drag.resized_to(Pos::default()), None);
    }
}
