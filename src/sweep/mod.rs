// src/sweep/mod.rs
pub mod channel;
pub mod detector;
pub mod dispatcher;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod plot;
pub mod render;
pub mod source;
pub mod wrap;
pub use channel::{ChannelPlan, ChannelStats, SurfaceRole, SweepChannel, Transition};
pub use detector::{count_sweeps, detect, split_index, SweepSignal};
pub use dispatcher::{SweepDispatcher, TickPlan, TickReport};
pub use error::SweepError;
pub use overlay::overlay_rect;
pub use pipeline::SweepPipeline;
pub use plot::{render_sweep_png, PlotStyle};
pub use render::{
    DrawHandle, HighlightId, OverlayId, OverlayRect, SurfaceId, SurfaceStore, SweepRenderer,
};
pub use source::{load_ecg_template, EcgSimulator, ManualSource, SampleSource};
pub use wrap::{wrap, wrap_samples};
