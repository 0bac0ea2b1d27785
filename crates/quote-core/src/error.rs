use thiserror::Error;

/// Structural failures raised by the editor and catalog lookups.
///
/// The financial calculations themselves never fail; only references to
/// entities that do not exist (or unparseable enum labels) surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("add-on not found: {0}")]
    AddOnNotFound(String),

    #[error("payment milestone not found: {0}")]
    MilestoneNotFound(String),

    #[error("skill not found in catalog: {0}")]
    SkillNotFound(String),

    #[error("event template not found in catalog: {0}")]
    TemplateNotFound(String),

    #[error("client not found in catalog: {0}")]
    ClientNotFound(String),

    #[error("position {index} out of range (len {len})")]
    PositionOutOfRange { index: usize, len: usize },

    #[error("unknown {kind}: {value:?}")]
    UnknownLabel { kind: &'static str, value: String },
}

impl CoreError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        CoreError::UnknownLabel {
            kind,
            value: value.to_string(),
        }
    }
}
