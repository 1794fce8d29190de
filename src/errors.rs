use std::fmt;

/// Dashboard pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Load,
    Enrich,
    Aggregate,
    Format,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Load => "load",
            PipelineStage::Enrich => "enrich",
            PipelineStage::Aggregate => "aggregate",
            PipelineStage::Format => "format",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Pipeline failed during {stage}: {message}")]
    Pipeline {
        stage: PipelineStage,
        message: String,
    },
}

impl AppError {
    /// Attach the failing stage to an error raised inside the pipeline.
    pub fn in_stage(self, stage: PipelineStage) -> Self {
        match self {
            AppError::Pipeline { .. } => self,
            other => AppError::Pipeline {
                stage,
                message: other.to_string(),
            },
        }
    }
}
