use crate::color::Channel;
use crate::element::ElementId;

/// Usage and configuration faults.
///
/// These indicate a mistake in the code driving the picker rather than bad
/// user input, so they are surfaced instead of absorbed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PickerError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("cannot install a color picker without a target element")]
    MissingTarget,

    #[error("color picker already installed on element {0}")]
    AlreadyInstalled(ElementId),

    #[error("option '{option}' has invalid value: {value}")]
    InvalidOption { option: String, value: String },

    #[error("invalid picker configuration: {0}")]
    InvalidConfig(String),
}

/// A mutator was handed a channel value that is not a number.
///
/// The instance is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("channel '{0}' is not a number")]
    NotANumber(Channel),
}

/// Color text could not be parsed. The instance is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized color: {0:?}")]
pub struct ColorParseError(pub String);
