use crate::connection::Connection;
use crate::event::Event;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::geometry::StackMode;
use crate::geometry::WindowChanges;
use crate::input::Button;
use crate::input::KeyCode;
use crate::input::MouseShortcut;
use crate::window::Window;
use crate::Result;

use std::convert::TryFrom;

use x11rb::connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::protocol::xproto::EventMask;
use x11rb::protocol::xproto::ModMask;
use x11rb::protocol::ErrorKind;
use x11rb::protocol::Event as XEvent;

use anyhow::anyhow;
use log::debug;

const SENT_EVENT_BIT: u8 = 0x80;

pub struct XConnection<'conn, Conn: connection::Connection> {
    conn: &'conn Conn,
    screen: xproto::Screen,
    root_event_mask: EventMask,
    mouse_event_mask: EventMask,
    drag_event_mask: EventMask,
}

impl<'conn, Conn: connection::Connection> XConnection<'conn, Conn> {
    /// Claims window management on the root window of `screen_num`.
    ///
    /// Substructure redirect is requested while the server is grabbed. Only
    /// one client may hold it, so this fails if another window manager is
    /// running.
    pub fn new(
        conn: &'conn Conn,
        screen_num: usize,
    ) -> Result<Self> {
        let screen = conn
            .setup()
            .roots
            .get(screen_num)
            .cloned()
            .ok_or_else(|| anyhow!("no screen with index {}", screen_num))?;

        let root_event_mask: EventMask = EventMask::SUBSTRUCTURE_REDIRECT;

        let mouse_event_mask: EventMask = EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE;

        let drag_event_mask: EventMask = EventMask::BUTTON_RELEASE
            | EventMask::BUTTON_MOTION
            | EventMask::POINTER_MOTION_HINT;

        conn.grab_server()?;

        let aux = xproto::ChangeWindowAttributesAux::default().event_mask(root_event_mask);
        let res = conn.change_window_attributes(screen.root, &aux)?.check();

        drop(conn.ungrab_server());

        if let Err(err) = res {
            return match err {
                ReplyError::X11Error(err) if err.error_kind == ErrorKind::Access => {
                    Err(anyhow!("another window manager is already running"))
                },
                _ => Err(anyhow!("unable to set up window manager")),
            };
        }

        conn.flush()?;

        Self::init(Self {
            conn,
            screen,
            root_event_mask,
            mouse_event_mask,
            drag_event_mask,
        })
    }

    #[inline]
    fn init(connection: Self) -> Result<Self> {
        debug!(
            "claimed root window {:#0x} with event mask {:#0x}",
            connection.screen.root,
            u32::from(connection.root_event_mask)
        );

        Ok(connection)
    }
}

impl<'conn, Conn: connection::Connection> Connection for XConnection<'conn, Conn> {
    #[inline]
    fn root(&self) -> Window {
        self.screen.root
    }

    #[inline]
    fn flush(&self) {
        if let Err(err) = self.conn.flush() {
            debug!("unable to flush: {}", err);
        }
    }

    fn step(&self) -> Result<Event> {
        Ok(decode_event(self.conn.wait_for_event()?))
    }

    #[inline]
    fn get_pointer_position(&self) -> Result<Pos> {
        let reply = self.conn.query_pointer(self.screen.root)?.reply()?;

        Ok(Pos {
            x: reply.root_x as i32,
            y: reply.root_y as i32,
        })
    }

    #[inline]
    fn grab_pointer(&self) {
        drop(self.conn.grab_pointer(
            false,
            self.screen.root,
            u32::from(self.drag_event_mask) as u16,
            xproto::GrabMode::ASYNC,
            xproto::GrabMode::ASYNC,
            self.screen.root,
            x11rb::NONE,
            x11rb::CURRENT_TIME,
        ));
    }

    #[inline]
    fn release_pointer(&self) {
        drop(self.conn.ungrab_pointer(x11rb::CURRENT_TIME));
    }

    fn grab_buttons(
        &self,
        mouse_shortcuts: &[MouseShortcut],
    ) {
        // lock modifiers must not keep a binding from matching
        for &m in &[0, u16::from(ModMask::M2), u16::from(ModMask::M5)] {
            for mouse_shortcut in mouse_shortcuts {
                if let Ok(button) = xproto::ButtonIndex::try_from(u8::from(mouse_shortcut.button))
                {
                    drop(self.conn.grab_button(
                        false,
                        self.screen.root,
                        u32::from(self.mouse_event_mask) as u16,
                        xproto::GrabMode::ASYNC,
                        xproto::GrabMode::ASYNC,
                        x11rb::NONE,
                        x11rb::NONE,
                        button,
                        mouse_shortcut.mask() | m,
                    ));
                }
            }
        }

        self.flush();
    }

    fn cleanup(&self) {
        self.release_pointer();

        drop(self.conn.ungrab_button(
            xproto::ButtonIndex::ANY,
            self.screen.root,
            ModMask::ANY,
        ));

        self.flush();
    }

    #[inline]
    fn map_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.map_window(window));
    }

    #[inline]
    fn configure_window(
        &self,
        window: Window,
        changes: &WindowChanges,
    ) {
        let stack_mode = changes.stack_mode.map(|stack_mode| match stack_mode {
            StackMode::Above => xproto::StackMode::ABOVE,
            StackMode::Below => xproto::StackMode::BELOW,
            StackMode::TopIf => xproto::StackMode::TOP_IF,
            StackMode::BottomIf => xproto::StackMode::BOTTOM_IF,
            StackMode::Opposite => xproto::StackMode::OPPOSITE,
        });

        // the value mask and the order of the value list are derived here
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .x(changes.x)
                    .y(changes.y)
                    .width(changes.width)
                    .height(changes.height)
                    .sibling(changes.sibling)
                    .stack_mode(stack_mode),
            ),
        );
    }

    #[inline]
    fn focus_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.set_input_focus(
            xproto::InputFocus::POINTER_ROOT,
            window,
            x11rb::CURRENT_TIME,
        ));
    }

    #[inline]
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region> {
        Ok(self.conn.get_geometry(window)?.reply().map(|reply| {
            Region::new(
                reply.x as i32,
                reply.y as i32,
                reply.width as i32,
                reply.height as i32,
            )
        })?)
    }
}

fn decode_event(event: XEvent) -> Event {
    match event {
        XEvent::MapRequest(e) => on_map_request(&e),
        XEvent::ConfigureRequest(e) => on_configure_request(&e),
        XEvent::ButtonPress(e) => on_button_press(&e),
        XEvent::ButtonRelease(_) => Event::ButtonRelease,
        XEvent::MotionNotify(e) => on_motion_notify(&e),
        XEvent::KeyPress(e) => on_key_press(&e),
        XEvent::Error(err) => {
            debug!("received error: {:?}", err);

            Event::Unrecognized {
                opcode: 0,
            }
        },
        event => Event::Unrecognized {
            opcode: event.raw_response_type() & !SENT_EVENT_BIT,
        },
    }
}

#[inline]
fn on_map_request(event: &xproto::MapRequestEvent) -> Event {
    Event::MapRequest {
        window: event.window,
    }
}

fn on_configure_request(event: &xproto::ConfigureRequestEvent) -> Event {
    let is_set = |field: xproto::ConfigWindow| event.value_mask & u16::from(field) != 0;
    let mut changes = WindowChanges::default();

    if is_set(xproto::ConfigWindow::X) {
        changes.x = Some(event.x as i32);
    }

    if is_set(xproto::ConfigWindow::Y) {
        changes.y = Some(event.y as i32);
    }

    if is_set(xproto::ConfigWindow::WIDTH) {
        changes.width = Some(event.width as u32);
    }

    if is_set(xproto::ConfigWindow::HEIGHT) {
        changes.height = Some(event.height as u32);
    }

    if is_set(xproto::ConfigWindow::SIBLING) {
        changes.sibling = Some(event.sibling);
    }

    if is_set(xproto::ConfigWindow::STACK_MODE) {
        changes.stack_mode = match event.stack_mode {
            xproto::StackMode::ABOVE => Some(StackMode::Above),
            xproto::StackMode::BELOW => Some(StackMode::Below),
            xproto::StackMode::TOP_IF => Some(StackMode::TopIf),
            xproto::StackMode::BOTTOM_IF => Some(StackMode::BottomIf),
            xproto::StackMode::OPPOSITE => Some(StackMode::Opposite),
            _ => None,
        };
    }

    Event::ConfigureRequest {
        window: event.window,
        changes,
    }
}

fn on_button_press(event: &xproto::ButtonPressEvent) -> Event {
    match Button::try_from(event.detail) {
        Ok(button) => Event::ButtonPress {
            window: if event.child == x11rb::NONE {
                None
            } else {
                Some(event.child)
            },
            button,
            root_rpos: Pos {
                x: event.root_x as i32,
                y: event.root_y as i32,
            },
        },
        Err(_) => Event::UnrecognizedButton {
            button: event.detail,
        },
    }
}

#[inline]
fn on_motion_notify(event: &xproto::MotionNotifyEvent) -> Event {
    Event::Motion {
        root_rpos: Pos {
            x: event.root_x as i32,
            y: event.root_y as i32,
        },
    }
}

#[inline]
fn on_key_press(event: &xproto::KeyPressEvent) -> Event {
    Event::KeyPress {
        key_code: KeyCode {
            mask: event.state,
            code: event.detail,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use x11rb::x11_utils::X11Error;

    const ROOT: Window = 0x0000_0100;
    const CLIENT: Window = 0x0040_0001;
    const SIBLING: Window = 0x0040_0002;

    fn configure_request(
        value_mask: u16,
        stack_mode: u8,
    ) -> xproto::ConfigureRequestEvent {
        xproto::ConfigureRequestEvent {
            response_type: xproto::CONFIGURE_REQUEST_EVENT,
            stack_mode: xproto::StackMode::from(stack_mode),
            sequence: 0,
            parent: ROOT,
            window: CLIENT,
            sibling: SIBLING,
            x: 12,
            y: 34,
            width: 640,
            height: 480,
            border_width: 0,
            value_mask,
        }
    }

    fn button_press(
        detail: u8,
        child: Window,
    ) -> xproto::ButtonPressEvent {
        xproto::ButtonPressEvent {
            response_type: xproto::BUTTON_PRESS_EVENT,
            detail,
            sequence: 0,
            time: 0,
            root: ROOT,
            event: ROOT,
            child,
            root_x: 250,
            root_y: 125,
            event_x: 250,
            event_y: 125,
            state: 0,
            same_screen: true,
        }
    }

    fn changes_of(event: Event) -> Option<WindowChanges> {
        match event {
            Event::ConfigureRequest {
                changes, ..
            } => Some(changes),
            _ => None,
        }
    }

    #[test]
    fn configure_request_keeps_only_masked_fields() {
        let value_mask =
            u16::from(xproto::ConfigWindow::X) | u16::from(xproto::ConfigWindow::HEIGHT);
        let event = decode_event(XEvent::ConfigureRequest(configure_request(value_mask, 0)));

        assert_eq!(
            event,
            Event::ConfigureRequest {
                window: CLIENT,
                changes: WindowChanges {
                    x: Some(12),
                    height: Some(480),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn configure_request_without_mask_changes_nothing() {
        let changes = changes_of(on_configure_request(&configure_request(0, 0)));

        assert_eq!(changes, Some(WindowChanges::default()));
    }

    #[test]
    fn configure_request_decodes_sibling_and_stack_mode() {
        let value_mask =
            u16::from(xproto::ConfigWindow::SIBLING) | u16::from(xproto::ConfigWindow::STACK_MODE);

        let changes = changes_of(on_configure_request(&configure_request(value_mask, 1)));

        assert_eq!(
            changes,
            Some(WindowChanges {
                sibling: Some(SIBLING),
                stack_mode: Some(StackMode::Below),
                ..Default::default()
            })
        );
    }

    #[test]
    fn out_of_range_stack_mode_is_dropped() {
        let value_mask = u16::from(xproto::ConfigWindow::STACK_MODE);
        let changes = changes_of(on_configure_request(&configure_request(value_mask, 7)));

        assert_eq!(changes, Some(WindowChanges::default()));
    }

    #[test]
    fn button_press_on_child_carries_window_and_position() {
        assert_eq!(
            decode_event(XEvent::ButtonPress(button_press(3, CLIENT))),
            Event::ButtonPress {
                window: Some(CLIENT),
                button: Button::Right,
                root_rpos: Pos {
                    x: 250,
                    y: 125,
                },
            }
        );
    }

    #[test]
    fn button_press_without_child_has_no_window() {
        match on_button_press(&button_press(1, x11rb::NONE)) {
            Event::ButtonPress {
                window, button, ..
            } => {
                assert_eq!(window, None);
                assert_eq!(button, Button::Left);
            },
            event => panic!("unexpected event {:?}", event),
        }
    }

    #[test]
    fn unknown_button_detail_is_reported_as_such() {
        assert_eq!(
            on_button_press(&button_press(6, CLIENT)),
            Event::UnrecognizedButton {
                button: 6,
            }
        );
    }

    #[test]
    fn sent_event_bit_is_masked_from_unhandled_opcodes() {
        let expose = xproto::ExposeEvent {
            response_type: xproto::EXPOSE_EVENT | SENT_EVENT_BIT,
            sequence: 0,
            window: CLIENT,
            x: 0,
            y: 0,
            width: 10,
            height: 10,
            count: 0,
        };

        assert_eq!(
            decode_event(XEvent::Expose(expose)),
            Event::Unrecognized {
                opcode: xproto::EXPOSE_EVENT,
            }
        );
    }

    #[test]
    fn x_errors_are_reported_as_opcode_zero() {
        let error = X11Error {
            error_kind: ErrorKind::Window,
            error_code: xproto::WINDOW_ERROR,
            sequence: 0,
            bad_value: CLIENT,
            minor_opcode: 0,
            major_opcode: xproto::CONFIGURE_WINDOW_REQUEST,
        };

        assert_eq!(
            decode_event(XEvent::Error(error)),
            Event::Unrecognized {
                opcode: 0,
            }
        );
    }
}
