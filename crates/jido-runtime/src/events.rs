//! Event type suffixes emitted by the server.
//!
//! Full event types are `jido.agent.event.<suffix>`. The executor
//! emits queue and step events around every dispatch; the command and
//! directive paths emit the `cmd.*` family; every status change emits
//! [`TRANSITION`].

/// Queue drain began; payload carries `queue_length`.
pub const QUEUE_STARTED: &str = "queue.processing.started";

/// Queue drained to empty.
pub const QUEUE_COMPLETED: &str = "queue.processing.completed";

/// A step failed and draining stopped; remaining signals stay queued.
pub const QUEUE_FAILED: &str = "queue.processing.failed";

/// A dequeued signal completed.
pub const STEP_COMPLETED: &str = "queue.step.completed";

/// A dequeued signal was ignored; payload carries `reason`.
pub const STEP_IGNORED: &str = "queue.step.ignored";

/// A dequeued signal failed; payload carries the failed signal id and
/// reason.
pub const STEP_FAILED: &str = "queue.step.failed";

/// Command finished with no pending instructions.
pub const CMD_SUCCESS: &str = "cmd.success";

/// Command finished and left pending instructions, now re-queued as
/// fresh command signals.
pub const CMD_SUCCESS_PENDING: &str = "cmd.success.pending";

/// Command failed; payload carries the error message and code.
pub const CMD_FAILED: &str = "cmd.failed";

/// Status changed; payload carries `from` and `to`.
pub const TRANSITION: &str = "transition";

/// Server directives produced by a dispatch, returned to the owner.
/// Emitted by the serving loop so loop-driven hosts observe them.
pub const DIRECTIVES_RETURNED: &str = "cmd.directives";
