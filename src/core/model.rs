use crate::defaults;
use crate::drag::Drag;
use crate::drag::DragKind;
use crate::placement::placement_changes;

use winsys::connection::Connection;
use winsys::event::Event;
use winsys::geometry::Dim;
use winsys::geometry::Pos;
use winsys::geometry::StackMode;
use winsys::geometry::WindowChanges;
use winsys::input::Button;
use winsys::input::KeyCode;
use winsys::window::Window;
use winsys::window::NONE;
use winsys::Result;

use anyhow::Context;

pub struct Model<'a> {
    conn: &'a dyn Connection,
    root: Window,
    drag: Option<Drag>,
}

impl<'a> Model<'a> {
    pub fn new(conn: &'a dyn Connection) -> Self {
        Self::init(Self {
            conn,
            root: conn.root(),
            drag: None,
        })
    }

    fn init(model: Self) -> Self {
        info!("initializing window manager");
        model.conn.grab_buttons(&defaults::mouse_shortcuts());

        model
    }

    /// Handles events one at a time until the connection breaks, at which
    /// point the error is handed back to the caller for teardown.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let event = self
                .conn
                .step()
                .context("lost connection to the X server")?;

            trace!("received {} event: {:?}", event.kind(), event);

            match event {
                Event::MapRequest {
                    window,
                } => self.handle_map_request(window),
                Event::ConfigureRequest {
                    window,
                    changes,
                } => self.handle_configure_request(window, &changes),
                Event::ButtonPress {
                    window,
                    button,
                    root_rpos,
                } => self.handle_button_press(window, button, root_rpos),
                Event::ButtonRelease => self.handle_button_release(),
                Event::Motion {
                    root_rpos,
                } => self.handle_motion(root_rpos),
                Event::KeyPress {
                    key_code,
                } => self.handle_key_press(key_code),
                Event::UnrecognizedButton {
                    button,
                } => self.handle_unrecognized_button(button),
                Event::Unrecognized {
                    opcode,
                } => self.handle_unrecognized(opcode),
            }

            self.conn.flush();
        }
    }

    #[inline]
    fn is_manageable(
        &self,
        window: Window,
    ) -> bool {
        window != NONE && window != self.root
    }

    pub fn set_focus(
        &self,
        window: Window,
    ) {
        if self.is_manageable(window) {
            debug!("focusing window {:#0x}", window);
            self.conn.focus_window(window);
        }
    }

    pub fn resize_window(
        &self,
        window: Window,
        dim: Dim,
    ) {
        if self.is_manageable(window) {
            self.conn
                .configure_window(window, &WindowChanges::from_dim(dim));
        }
    }

    pub fn move_window(
        &self,
        window: Window,
        pos: Pos,
    ) {
        if self.is_manageable(window) {
            self.conn
                .configure_window(window, &WindowChanges::from_pos(pos));
        }
    }

    pub fn stack_window_above(
        &self,
        window: Window,
    ) {
        self.conn
            .configure_window(window, &WindowChanges::from_stack_mode(StackMode::Above));
    }

    pub fn apply_geometry(
        &self,
        window: Window,
        request: &WindowChanges,
    ) {
        for changes in placement_changes(request) {
            self.conn.configure_window(window, &changes);
        }
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    fn handle_map_request(
        &mut self,
        window: Window,
    ) {
        debug!("MAP_REQUEST for window {:#0x}", window);

        self.conn.map_window(window);
        self.set_focus(window);
        self.conn.flush();
    }

    fn handle_configure_request(
        &mut self,
        window: Window,
        changes: &WindowChanges,
    ) {
        debug!("CONFIGURE_REQUEST for window {:#0x}: {:?}", window, changes);

        self.apply_geometry(window, changes);
        self.conn.flush();
    }

    fn handle_button_press(
        &mut self,
        window: Option<Window>,
        button: Button,
        root_rpos: Pos,
    ) {
        let window = match window {
            Some(window) if self.is_manageable(window) => window,
            _ => return,
        };

        debug!("BUTTON_PRESS {:?} on window {:#0x}", button, window);

        self.stack_window_above(window);

        let window_region = self.conn.get_window_geometry(window).ok();
        if window_region.is_none() {
            warn!("unable to read geometry of window {:#0x}", window);
        }

        self.drag = Some(Drag::new(
            DragKind::from(button),
            window,
            root_rpos,
            window_region,
        ));

        self.conn.grab_pointer();
        self.conn.flush();
    }

    fn handle_button_release(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!("BUTTON_RELEASE, dropping window {:#0x}", drag.window());
        }

        self.conn.release_pointer();
        self.conn.flush();
    }

    fn handle_motion(
        &mut self,
        root_rpos: Pos,
    ) {
        let drag = match self.drag {
            Some(drag) => drag,
            None => return,
        };

        // querying the pointer also re-arms the motion hint
        let pos = match self.conn.get_pointer_position() {
            Ok(pos) => pos,
            Err(err) => {
                debug!("unable to query pointer: {}", err);
                return;
            },
        };

        trace!("MOTION from {:?} to {:?}", root_rpos, pos);

        match drag.kind() {
            DragKind::Move => {
                if let Some(pos) = drag.moved_to(pos) {
                    self.move_window(drag.window(), pos);
                }
            },
            DragKind::Resize => {
                if let Some(dim) = drag.resized_to(pos) {
                    self.resize_window(drag.window(), dim);
                }
            },
        }

        self.conn.flush();
    }

    fn handle_key_press(
        &mut self,
        key_code: KeyCode,
    ) {
        trace!(
            "KEY_PRESS {} with modifiers {:?}",
            key_code.code,
            key_code.modifiers()
        );
    }

    fn handle_unrecognized_button(
        &mut self,
        button: u8,
    ) {
        info!("unrecognized button: {}", button);
    }

    fn handle_unrecognized(
        &mut self,
        opcode: u8,
    ) {
        info!("unrecognized opcode: {}", opcode);
    }
}

impl<'a> Drop for Model<'a> {
    fn drop(&mut self) {
        if self.drag.take().is_some() {
            self.conn.release_pointer();
            self.conn.flush();
        }
    }
}
