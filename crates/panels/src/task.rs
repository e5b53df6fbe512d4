use std::future::Future;

use tokio::task::JoinHandle;

/// Execution class of a spawned task, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// The control task owning orchestrator state.
	Control,
	/// Awaiting a result future on behalf of a panel.
	Results,
	/// Best-effort collaborator calls (history, autocomplete).
	Background,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Control => "control",
			Self::Results => "results",
			Self::Background => "background",
		}
	}
}

/// Spawns a task on the current Tokio runtime.
///
/// Spawned tasks never touch orchestrator state; they report back through the
/// message bus.
pub(crate) fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task_class = class.as_str(), "panels.spawn");
	tokio::spawn(fut)
}
