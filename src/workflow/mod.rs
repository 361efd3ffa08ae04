//! Meeting-processing workflow core.
//!
//! Orchestrates the pipeline from recorded audio to scheduled follow-up
//! actions, with a human review gate between extraction and scheduling.

pub mod error;
pub mod items;
pub mod machine;
pub mod state;
pub mod timeslot;

pub use error::WorkflowError;
pub use items::{
    eligible_events, edit_field, normalize, split_datetime, ActionItem, ActionItemInput,
    DurationBounds, EventRequest, ItemField, MeetingAnalysis, DEFAULT_DURATION_MINUTES,
};
pub use machine::{MeetingWorkflow, ScheduleResult, UploadPolicy};
pub use state::{
    StageStatus, WorkflowHandle, WorkflowPhase, WorkflowState, MSG_NO_ELIGIBLE_ACTIONS,
    MSG_SCHEDULED, MSG_TRANSCRIPT_INVALID,
};
pub use timeslot::Timeslot;
