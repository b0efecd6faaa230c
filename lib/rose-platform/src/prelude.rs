pub use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{self as events, *},
    window::{Fullscreen, WindowBuilder},
};

pub use crate::{circbuffer::CircBuffer, Application, RenderContext, RenderStats, TickContext};

pub use crate::run;
