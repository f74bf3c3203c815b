use std::fmt;

use tracing::debug;

/// Steps every mutation walks through, in order. A rejection can end the walk
/// at any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitAuth,
    AwaitState,
    AwaitBody,
    Resolving,
    Authorizing,
    Mutating,
    ReIssuing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::AwaitAuth => "await-auth",
            Stage::AwaitState => "await-state",
            Stage::AwaitBody => "await-body",
            Stage::Resolving => "resolving",
            Stage::Authorizing => "authorizing",
            Stage::Mutating => "mutating",
            Stage::ReIssuing => "re-issuing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Per-call stage logger.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Trace {
    op: &'static str,
}

impl Trace {
    pub(crate) fn new(op: &'static str) -> Self {
        Self { op }
    }

    pub(crate) fn enter(&self, stage: Stage) {
        debug!(op = self.op, %stage, "coordinator stage");
    }
}
