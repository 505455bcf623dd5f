use crate::event::Event;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::geometry::WindowChanges;
use crate::input::MouseShortcut;
use crate::window::Window;
use crate::Result;

pub trait Connection {
    fn root(&self) -> Window;
    fn flush(&self);

    /// Blocks until the next event arrives; an error means the connection
    /// to the server is gone.
    fn step(&self) -> Result<Event>;

    fn get_pointer_position(&self) -> Result<Pos>;
    fn grab_pointer(&self);
    fn release_pointer(&self);
    fn grab_buttons(
        &self,
        mouse_shortcuts: &[MouseShortcut],
    );
    fn cleanup(&self);

    // Window manipulation
    fn map_window(
        &self,
        window: Window,
    );
    fn configure_window(
        &self,
        window: Window,
        changes: &WindowChanges,
    );
    fn focus_window(
        &self,
        window: Window,
    );
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region>;
}
