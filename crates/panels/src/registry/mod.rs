//! Keyed store of live panels plus the single live-search designation.

use indexmap::IndexMap;
use quarry_protocol::{PanelId, Query};

use crate::host::DisplaySurface;
use crate::session::Session;


/// Identifies one opening of a panel. Reopening the same id yields a new generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PanelGeneration(u64);

/// One live panel: its surface, the session of the query it shows, and that query.
pub struct PanelHandle {
	pub surface: Box<dyn DisplaySurface>,
	pub session: Session,
	pub query: Query,
	generation: PanelGeneration,
}

impl PanelHandle {
	pub fn new(surface: Box<dyn DisplaySurface>, session: Session, query: Query) -> Self {
		Self {
			surface,
			session,
			query,
			generation: PanelGeneration::default(),
		}
	}

	/// Stamped by [`PanelRegistry::save`].
	pub fn generation(&self) -> PanelGeneration {
		self.generation
	}
}

impl std::fmt::Debug for PanelHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PanelHandle")
			.field("session", &self.session.id())
			.field("query", &self.query.input)
			.field("generation", &self.generation.0)
			.finish_non_exhaustive()
	}
}

/// Panels in creation order. At most one id is designated live search.
#[derive(Debug, Default)]
pub struct PanelRegistry {
	panels: IndexMap<PanelId, PanelHandle>,
	live_search_panel: Option<PanelId>,
	generations: u64,
}

impl PanelRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `handle` as the most recent panel under a fresh generation,
	/// returning any handle it replaced.
	pub fn save(&mut self, id: PanelId, mut handle: PanelHandle) -> Option<PanelHandle> {
		self.generations += 1;
		handle.generation = PanelGeneration(self.generations);
		let replaced = self.panels.shift_remove(&id);
		self.panels.insert(id, handle);
		replaced
	}

	pub fn get(&self, id: &PanelId) -> Option<&PanelHandle> {
		self.panels.get(id)
	}

	pub fn get_mut(&mut self, id: &PanelId) -> Option<&mut PanelHandle> {
		self.panels.get_mut(id)
	}

	pub fn contains(&self, id: &PanelId) -> bool {
		self.panels.contains_key(id)
	}

	/// Whether `id` is still the opening that was stamped `generation`.
	pub fn is_current(&self, id: &PanelId, generation: PanelGeneration) -> bool {
		self.panels.get(id).is_some_and(|handle| handle.generation == generation)
	}

	/// Removes a panel. The live-search designation is left to the state machine.
	pub fn delete(&mut self, id: &PanelId) -> Option<PanelHandle> {
		self.panels.shift_remove(id)
	}

	/// Last panel in insertion order.
	pub fn most_recent_panel(&self) -> Option<(&PanelId, &PanelHandle)> {
		self.panels.last()
	}

	pub fn most_recent_panel_mut(&mut self) -> Option<(&PanelId, &mut PanelHandle)> {
		self.panels.last_mut()
	}

	pub fn live_search_panel_id(&self) -> Option<&PanelId> {
		self.live_search_panel.as_ref()
	}

	pub fn is_live_search_panel(&self, id: &PanelId) -> bool {
		self.live_search_panel.as_ref() == Some(id)
	}

	pub(crate) fn set_live_search_panel_id(&mut self, id: PanelId) {
		self.live_search_panel = Some(id);
	}

	pub(crate) fn clear_live_search_panel(&mut self) -> Option<PanelId> {
		self.live_search_panel.take()
	}

	pub fn len(&self) -> usize {
		self.panels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.panels.is_empty()
	}

	pub fn ids(&self) -> impl Iterator<Item = &PanelId> {
		self.panels.keys()
	}

	/// Removes every panel, oldest first.
	pub(crate) fn drain(&mut self) -> impl Iterator<Item = (PanelId, PanelHandle)> + '_ {
		self.live_search_panel = None;
		self.panels.drain(..)
	}
}
