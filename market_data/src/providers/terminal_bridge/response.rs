use serde::Deserialize;

use crate::providers::terminal::TerminalError;

/// Terminal error code for invalid call parameters. Rate calls answer with it
/// when the requested window holds more bars than the terminal serves at once.
pub const INVALID_PARAMS: i32 = -2;

/// Error half of a bridge reply.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BridgeFault {
    pub code: i32,
    pub message: String,
}

/// Envelope every bridge endpoint answers with.
#[derive(Deserialize, Debug)]
pub struct BridgeReply<T> {
    pub data: Option<T>,
    pub error: Option<BridgeFault>,
}

impl<T> BridgeReply<T> {
    pub fn into_result(self) -> Result<T, TerminalError> {
        match (self.data, self.error) {
            (_, Some(fault)) => Err(TerminalError::Call {
                code: fault.code,
                message: fault.message,
            }),
            (Some(data), None) => Ok(data),
            (None, None) => Err(TerminalError::Malformed(
                "reply carries neither data nor error".to_string(),
            )),
        }
    }
}
