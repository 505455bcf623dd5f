pub type Window = u32;

/// The null window; never a valid target for focus or geometry requests.
pub const NONE: Window = 0;
