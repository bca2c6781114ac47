pub mod channel;
pub mod message;
pub mod pipeline_component;
pub mod pipeline_task;
pub mod stage_group;

pub use channel::{Sender, Receiver};
pub use message::Message;
pub use pipeline_component::{PipelineComponent, SinkComponent, SourceComponent};
pub use pipeline_task::{spawn_sink, spawn_source, spawn_stage, PipelineTask};
pub use stage_group::{StageGroup, StageRegistration, StageState, StageTransition};
