pub use crate::Result;

use std::convert::TryFrom;

use anyhow::anyhow;
use strum::EnumIter;
use strum::IntoEnumIterator;

#[derive(Debug, PartialEq, EnumIter, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    AltGr,
    Super,
    NumLock,
    ScrollLock,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Button {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
    Backward,
    Forward,
}

impl From<Button> for u8 {
    fn from(button: Button) -> u8 {
        match button {
            Button::Left => 1,
            Button::Middle => 2,
            Button::Right => 3,
            Button::ScrollUp => 4,
            Button::ScrollDown => 5,
            Button::Backward => 8,
            Button::Forward => 9,
        }
    }
}

impl TryFrom<u8> for Button {
    type Error = anyhow::Error;

    fn try_from(val: u8) -> Result<Self> {
        match val {
            1 => Ok(Self::Left),
            2 => Ok(Self::Middle),
            3 => Ok(Self::Right),
            4 => Ok(Self::ScrollUp),
            5 => Ok(Self::ScrollDown),
            8 => Ok(Self::Backward),
            9 => Ok(Self::Forward),
            _ => Err(anyhow!("no matching button for value {}", val)),
        }
    }
}

/// A button combined with the modifiers that must be held for it to be
/// grabbed on the root window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MouseShortcut {
    pub button: Button,
    pub modifiers: Vec<Modifier>,
}

impl MouseShortcut {
    pub fn new(
        modifiers: &[Modifier],
        button: Button,
    ) -> Self {
        Self {
            button,
            modifiers: modifiers.to_vec(),
        }
    }

    pub fn mask(&self) -> u16 {
        self.modifiers
            .iter()
            .fold(0, |acc, &modifier| acc | u16::from(modifier))
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyCode {
    pub mask: u16,
    pub code: u8,
}

impl KeyCode {
    pub fn modifiers(&self) -> Vec<Modifier> {
        Modifier::iter()
            .filter(|&modifier| self.mask & u16::from(modifier) != 0)
            .collect()
    }
}
