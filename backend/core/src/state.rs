use crate::error::ExtractionError;

/// Lifecycle of the extraction trigger. Only `Extracting` gates a new run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtractionState {
    #[default]
    Idle,
    Extracting,
    Done,
    Failed(ExtractionError),
}

impl ExtractionState {
    /// True while a run is outstanding; front-ends show the loading indicator.
    pub fn is_loading(&self) -> bool {
        matches!(self, ExtractionState::Extracting)
    }

    pub fn can_start(&self) -> bool {
        !self.is_loading()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExtractionState::Idle => "idle",
            ExtractionState::Extracting => "extracting",
            ExtractionState::Done => "done",
            ExtractionState::Failed(_) => "failed",
        }
    }
}
