use crate::geometry::Pos;
use crate::geometry::WindowChanges;
use crate::input::Button;
use crate::input::KeyCode;
use crate::window::Window;

use strum::IntoStaticStr;

/// A server event, decoded once at the connection boundary.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Event {
    MapRequest {
        window: Window,
    },
    ConfigureRequest {
        window: Window,
        changes: WindowChanges,
    },
    ButtonPress {
        window: Option<Window>,
        button: Button,
        root_rpos: Pos,
    },
    ButtonRelease,
    Motion {
        root_rpos: Pos,
    },
    KeyPress {
        key_code: KeyCode,
    },
    UnrecognizedButton {
        button: u8,
    },
    Unrecognized {
        opcode: u8,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}
