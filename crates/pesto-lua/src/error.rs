use thiserror::Error;

/// Failure to install the bridge into a Lua state.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("pesto is already installed in this Lua state")]
    AlreadyInstalled,

    #[error(transparent)]
    Lua(#[from] mlua::Error),
}

/// Misuse of the draw state machine. Raised into Lua as a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("beginDrawing called while already drawing")]
    PassAlreadyActive,

    #[error("drawing requires beginDrawing() or beginTextureMode()")]
    NoActivePass,

    #[error("endTextureMode called without a matching beginTextureMode")]
    TargetStackEmpty,

    #[error("endDrawing called with {depth} texture mode(s) still active")]
    UnbalancedTextureMode { depth: usize },
}

impl From<DrawError> for mlua::Error {
    fn from(err: DrawError) -> Self {
        mlua::Error::external(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_message_names_depth() {
        let msg = DrawError::UnbalancedTextureMode { depth: 2 }.to_string();
        assert!(msg.contains('2'), "{msg}");
    }

    #[test]
    fn draw_error_converts_to_external() {
        let err: mlua::Error = DrawError::NoActivePass.into();
        assert!(matches!(err, mlua::Error::ExternalError(_)));
    }
}
