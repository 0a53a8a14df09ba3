use super::pointer::Pointer;

/// What a node's execution asks of the constructs around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// Ordinary value, execution continues.
    Nothing,
    Return,
    Break,
    Continue,
    Exception,
}

/// Result envelope of every node execution.
///
/// Anything other than `Nothing` short-circuits the enclosing block until a
/// construct that owns the signal intercepts it (`while` for `Break` and
/// `Continue`; nothing inside the core intercepts `Return` or `Exception`).
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub kind: ReturnKind,
    pub pointer: Option<Pointer>,
    pub message: Option<String>,
}

impl Return {
    pub fn nothing() -> Self {
        Return {
            kind: ReturnKind::Nothing,
            pointer: None,
            message: None,
        }
    }

    pub fn value(pointer: Pointer) -> Self {
        Return {
            kind: ReturnKind::Nothing,
            pointer: Some(pointer),
            message: None,
        }
    }

    pub fn returned(pointer: Option<Pointer>) -> Self {
        Return {
            kind: ReturnKind::Return,
            pointer,
            message: None,
        }
    }

    pub fn brk() -> Self {
        Return {
            kind: ReturnKind::Break,
            pointer: None,
            message: None,
        }
    }

    pub fn cont() -> Self {
        Return {
            kind: ReturnKind::Continue,
            pointer: None,
            message: None,
        }
    }

    pub fn exception(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::trace!(%message, "raising exception");
        Return {
            kind: ReturnKind::Exception,
            pointer: None,
            message: Some(message),
        }
    }

    pub fn is_nothing(&self) -> bool {
        self.kind == ReturnKind::Nothing
    }
}
