//! Control task owning the orchestrator, and the handle that feeds it.

use std::ops::ControlFlow;

use quarry_protocol::LiveSearchAction;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::PanelsConfig;
use crate::host::Host;
use crate::msg::{MsgReceiver, MsgSender, PanelMsg, SearchOutput, channel};
use crate::orchestrator::PanelOrchestrator;
use crate::task::{TaskClass, spawn};
use crate::{Error, Result};


/// Cloneable entry point into a running orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
	tx: MsgSender,
}

impl OrchestratorHandle {
	/// Hands over a query and the future of its results.
	pub fn show_results(&self, output: SearchOutput) -> Result<()> {
		self.send(PanelMsg::ShowResults(output))
	}

	/// Status indicator command: pause, resume or stop live search.
	pub fn live_search(&self, action: LiveSearchAction) -> Result<()> {
		self.send(PanelMsg::LiveSearch(action))
	}

	/// Brings the most recently created panel to the foreground.
	pub fn reveal_most_recent(&self) -> Result<()> {
		self.send(PanelMsg::RevealMostRecent)
	}

	/// Resolves once every message sent before this call has been applied.
	pub async fn flush(&self) -> Result<()> {
		let (reply, done) = oneshot::channel();
		self.send(PanelMsg::Flush(reply))?;
		done.await.map_err(|_| Error::Stopped)
	}

	/// Stops the control task. Surfaces and the status indicator are disposed.
	pub fn shutdown(&self) -> Result<()> {
		self.send(PanelMsg::Shutdown)
	}

	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	fn send(&self, msg: PanelMsg) -> Result<()> {
		self.tx.send(msg).map_err(|_| Error::Stopped)
	}
}

/// A spawned control task and its handle.
#[derive(Debug)]
pub struct OrchestratorRuntime {
	pub handle: OrchestratorHandle,
	pub join: JoinHandle<()>,
}

/// Spawns the control task on the current Tokio runtime.
pub fn spawn_orchestrator(config: PanelsConfig, host: Host) -> OrchestratorRuntime {
	let (tx, rx) = channel();
	let orchestrator = PanelOrchestrator::new(config, host, tx.clone());
	let join = spawn(TaskClass::Control, run(orchestrator, rx));
	OrchestratorRuntime {
		handle: OrchestratorHandle { tx },
		join,
	}
}

/// Applies bus messages in order until shutdown.
///
/// The orchestrator holds a sender of its own bus, so the loop ends on an
/// explicit [`PanelMsg::Shutdown`] rather than on the last handle dropping.
async fn run(mut orchestrator: PanelOrchestrator, mut rx: MsgReceiver) {
	tracing::debug!("panels.control.start");
	while let Some(msg) = rx.recv().await {
		if let ControlFlow::Break(()) = orchestrator.apply(msg) {
			break;
		}
	}
	rx.close();
	orchestrator.dispose_all();
	tracing::debug!("panels.control.stop");
}
