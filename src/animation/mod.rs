//! Animation: the shared frame loop, easing curves and per-pointer
//! transition state.

pub mod coordinator;
pub mod easing;
pub mod pointer;

pub use coordinator::{
    AnimationCoordinator, CallbackResult, DEFAULT_TARGET_FPS, FrameInfo, FrameQueue,
    FrameScheduler, TickReport,
};
pub use easing::{Easing, ease_elastic_out, ease_exp_out};
pub use pointer::{PointerContext, PointerTransition, SharedPointerContext, pointer_animation};
