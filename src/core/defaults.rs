use winsys::geometry::Dim;
use winsys::input::Button;
use winsys::input::Modifier;
use winsys::input::MouseShortcut;

#[macro_export]
macro_rules! WM_NAME (
    () => { "pepper" };
);

pub const MIN_WINDOW_DIM: Dim = Dim {
    w: 75,
    h: 50,
};

pub const MOVE_BUTTON: Button = Button::Left;
pub const RESIZE_BUTTON: Button = Button::Right;

// debug builds usually run nested inside another window manager
pub const DRAG_MODIFIER: Modifier = if cfg!(debug_assertions) {
    Modifier::Alt
} else {
    Modifier::Super
};

pub fn mouse_shortcuts() -> Vec<MouseShortcut> {
    vec![
        MouseShortcut::new(&[DRAG_MODIFIER], MOVE_BUTTON),
        MouseShortcut::new(&[DRAG_MODIFIER], RESIZE_BUTTON),
    ]
}
