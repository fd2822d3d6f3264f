//! Host scroll surface contract
//!
//! The carousel never scrolls anything itself. It tells a [`ScrollSurface`]
//! what to do and the host reports gestures back through the carousel's
//! callbacks.

use glide_core::{Point, Size};

/// A horizontally scrolling view owned by the host
pub trait ScrollSurface {
    fn content_offset(&self) -> Point;

    fn content_size(&self) -> Size;

    fn set_content_offset(&mut self, offset: Point, animated: bool);

    fn set_content_size(&mut self, size: Size);

    /// Whether the surface pages by its own width
    fn set_paging_enabled(&mut self, enabled: bool);
}

/// A command received by a [`HeadlessSurface`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceCommand {
    SetContentOffset { offset: Point, animated: bool },
    SetContentSize(Size),
    SetPagingEnabled(bool),
}

/// In-memory surface that applies every command immediately
///
/// Animated scrolls jump straight to their target; the command log still
/// records that an animation was requested.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    offset: Point,
    size: Size,
    paging_enabled: bool,
    commands: Vec<SurfaceCommand>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paging_enabled(&self) -> bool {
        self.paging_enabled
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Take and clear the command log
    pub fn drain_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Last offset that was set, with its animation flag
    pub fn last_scroll(&self) -> Option<(Point, bool)> {
        self.commands.iter().rev().find_map(|command| match command {
            SurfaceCommand::SetContentOffset { offset, animated } => Some((*offset, *animated)),
            _ => None,
        })
    }
}

impl ScrollSurface for HeadlessSurface {
    fn content_offset(&self) -> Point {
        self.offset
    }

    fn content_size(&self) -> Size {
        self.size
    }

    fn set_content_offset(&mut self, offset: Point, animated: bool) {
        self.offset = offset;
        self.commands
            .push(SurfaceCommand::SetContentOffset { offset, animated });
    }

    fn set_content_size(&mut self, size: Size) {
        self.size = size;
        self.commands.push(SurfaceCommand::SetContentSize(size));
    }

    fn set_paging_enabled(&mut self, enabled: bool) {
        self.paging_enabled = enabled;
        self.commands.push(SurfaceCommand::SetPagingEnabled(enabled));
    }
}
