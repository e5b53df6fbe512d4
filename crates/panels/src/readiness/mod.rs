//! Per-panel readiness gate for outbound pushes.
//!
//! A panel starts pending. Pushes made while pending are parked in order and
//! handed back exactly once when the surface signals `uiReady`; afterwards pushes
//! pass straight through. The flag never returns to pending while the panel lives.

use std::collections::HashMap;

use quarry_protocol::{OutboundDirective, PanelId};

#[cfg(test)]
mod tests;

#[derive(Debug)]
enum Readiness {
	Pending(Vec<OutboundDirective>),
	Ready,
}

/// Outcome of offering a push to the gate.
#[derive(Debug, PartialEq)]
pub enum Admission {
	/// The surface is ready; deliver now.
	Deliver(OutboundDirective),
	/// Parked until the surface signals readiness.
	Parked,
	/// No such panel is tracked; the push is discarded.
	Untracked,
}

#[derive(Debug, Default)]
pub struct ReadinessTracker {
	panels: HashMap<PanelId, Readiness>,
}

impl ReadinessTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts tracking a panel as pending. Existing state is kept.
	pub fn track(&mut self, id: PanelId) {
		self.panels.entry(id).or_insert_with(|| Readiness::Pending(Vec::new()));
	}

	pub fn is_tracked(&self, id: &PanelId) -> bool {
		self.panels.contains_key(id)
	}

	pub fn is_ready(&self, id: &PanelId) -> bool {
		matches!(self.panels.get(id), Some(Readiness::Ready))
	}

	/// Number of pushes waiting for readiness.
	pub fn parked(&self, id: &PanelId) -> usize {
		match self.panels.get(id) {
			Some(Readiness::Pending(parked)) => parked.len(),
			_ => 0,
		}
	}

	pub fn admit(&mut self, id: &PanelId, directive: OutboundDirective) -> Admission {
		match self.panels.get_mut(id) {
			Some(Readiness::Ready) => Admission::Deliver(directive),
			Some(Readiness::Pending(parked)) => {
				parked.push(directive);
				Admission::Parked
			}
			None => Admission::Untracked,
		}
	}

	/// Marks a tracked panel ready and returns the parked pushes in order.
	///
	/// Returns an empty list if the panel was already ready and `None` if it is not
	/// tracked.
	pub fn mark_ready(&mut self, id: &PanelId) -> Option<Vec<OutboundDirective>> {
		let state = self.panels.get_mut(id)?;
		match std::mem::replace(state, Readiness::Ready) {
			Readiness::Pending(parked) => Some(parked),
			Readiness::Ready => Some(Vec::new()),
		}
	}

	/// Drops all state for a panel, including parked pushes.
	pub fn forget(&mut self, id: &PanelId) {
		self.panels.remove(id);
	}

	pub fn clear(&mut self) {
		self.panels.clear();
	}
}
