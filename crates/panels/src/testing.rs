//! Recording collaborator fakes shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use quarry_protocol::{AutocompleteSuggestion, ContentUpdate, HistoryRecord, OutboundDirective, PanelId, Severity};

use crate::host::{
	AutocompleteProvider, AutocompleteRequest, DisplaySurface, ExternalOpener, HistoryQuery, HistoryStore, Host, LiveSearchCommand, Notifier, SearchEngine,
	SearchRequest, StatusBar, StatusIndicator, SurfaceFactory, SurfaceInit, Telemetry,
};
use crate::msg::{MsgReceiver, SurfaceEvents, channel};
use crate::orchestrator::PanelOrchestrator;
use crate::session::{Metadata, PanelEvent, TimedEvent};
use crate::{Error, PanelsConfig, Result};

/// Lets every task that is ready to run make progress.
///
/// Under a paused clock this returns only once all spawned work has gone idle.
pub(crate) async fn idle() {
	tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Applies queued messages until the bus is quiet.
pub(crate) async fn pump(orchestrator: &mut PanelOrchestrator, rx: &mut MsgReceiver) {
	idle().await;
	while let Ok(msg) = rx.try_recv() {
		let _ = orchestrator.apply(msg);
		idle().await;
	}
}

#[derive(Debug, Default)]
pub(crate) struct SurfaceState {
	pub titles: Vec<String>,
	pub reveals: usize,
	pub posted: Vec<OutboundDirective>,
	pub disposed: usize,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct SurfaceLog(Arc<Mutex<SurfaceState>>);

impl SurfaceLog {
	pub fn boxed_surface(&self) -> Box<dyn DisplaySurface> {
		Box::new(FakeSurface { log: self.clone() })
	}

	pub fn posted(&self) -> Vec<OutboundDirective> {
		self.0.lock().posted.clone()
	}

	pub fn contents(&self) -> Vec<ContentUpdate> {
		self.0.lock().posted.iter().filter_map(OutboundDirective::as_content).cloned().collect()
	}

	pub fn titles(&self) -> Vec<String> {
		self.0.lock().titles.clone()
	}

	pub fn reveals(&self) -> usize {
		self.0.lock().reveals
	}

	pub fn disposed(&self) -> usize {
		self.0.lock().disposed
	}
}

struct FakeSurface {
	log: SurfaceLog,
}

impl DisplaySurface for FakeSurface {
	fn set_title(&mut self, title: &str) {
		self.log.0.lock().titles.push(title.to_string());
	}

	fn reveal(&mut self) {
		self.log.0.lock().reveals += 1;
	}

	fn post(&mut self, directive: &OutboundDirective) -> Result<()> {
		self.log.0.lock().posted.push(directive.clone());
		Ok(())
	}

	fn dispose(&mut self) {
		self.log.0.lock().disposed += 1;
	}
}

pub(crate) struct CreatedSurface {
	pub init: SurfaceInit,
	pub events: SurfaceEvents,
	pub log: SurfaceLog,
}

#[derive(Default)]
pub(crate) struct FakeSurfaces {
	created: Mutex<Vec<CreatedSurface>>,
	refuse: AtomicBool,
}

impl FakeSurfaces {
	pub fn refuse_creation(&self) {
		self.refuse.store(true, Ordering::SeqCst);
	}

	pub fn created(&self) -> usize {
		self.created.lock().len()
	}

	fn find<T>(&self, id: &str, f: impl FnOnce(&CreatedSurface) -> T) -> T {
		let created = self.created.lock();
		let surface = created
			.iter()
			.rev()
			.find(|surface| surface.init.panel_id.as_str() == id)
			.unwrap_or_else(|| panic!("no surface created for panel {id}"));
		f(surface)
	}

	pub fn log(&self, id: &str) -> SurfaceLog {
		self.find(id, |surface| surface.log.clone())
	}

	pub fn events(&self, id: &str) -> SurfaceEvents {
		self.find(id, |surface| surface.events.clone())
	}

	pub fn init(&self, id: &str) -> SurfaceInit {
		self.find(id, |surface| surface.init.clone())
	}
}

impl SurfaceFactory for FakeSurfaces {
	fn create(&self, init: SurfaceInit, events: SurfaceEvents) -> Result<Box<dyn DisplaySurface>> {
		if self.refuse.load(Ordering::SeqCst) {
			return Err(Error::Surface("surface host unavailable".into()));
		}
		let log = SurfaceLog::default();
		let surface = log.boxed_surface();
		self.created.lock().push(CreatedSurface { init, events, log });
		Ok(surface)
	}
}

#[derive(Debug, Default)]
pub(crate) struct IndicatorState {
	pub commands: Vec<Vec<LiveSearchCommand>>,
	pub disposed: usize,
}

#[derive(Default)]
pub(crate) struct FakeStatusBar {
	indicators: Mutex<Vec<Arc<Mutex<IndicatorState>>>>,
}

impl FakeStatusBar {
	pub fn shown(&self) -> usize {
		self.indicators.lock().len()
	}

	/// Indicators created but not yet disposed.
	pub fn live(&self) -> usize {
		self.indicators.lock().iter().filter(|state| state.lock().disposed == 0).count()
	}

	pub fn disposals(&self) -> usize {
		self.indicators.lock().iter().map(|state| state.lock().disposed).sum()
	}

	/// Command set currently displayed by the newest indicator.
	pub fn current_commands(&self) -> Option<Vec<LiveSearchCommand>> {
		let indicators = self.indicators.lock();
		let state = indicators.last()?.lock();
		(state.disposed == 0).then(|| state.commands.last().cloned().unwrap_or_default())
	}
}

struct FakeIndicator {
	state: Arc<Mutex<IndicatorState>>,
}

impl StatusIndicator for FakeIndicator {
	fn set_commands(&mut self, commands: &[LiveSearchCommand]) {
		self.state.lock().commands.push(commands.to_vec());
	}

	fn dispose(&mut self) {
		self.state.lock().disposed += 1;
	}
}

impl StatusBar for FakeStatusBar {
	fn show(&self, commands: &[LiveSearchCommand]) -> Box<dyn StatusIndicator> {
		let state = Arc::new(Mutex::new(IndicatorState {
			commands: vec![commands.to_vec()],
			disposed: 0,
		}));
		self.indicators.lock().push(Arc::clone(&state));
		Box::new(FakeIndicator { state })
	}
}

#[derive(Default)]
pub(crate) struct FakeTelemetry {
	recorded: Mutex<Vec<TimedEvent>>,
	emitted: Mutex<Vec<(PanelEvent, Metadata)>>,
}

impl FakeTelemetry {
	pub fn recorded(&self) -> Vec<TimedEvent> {
		self.recorded.lock().clone()
	}

	pub fn named(&self, event: PanelEvent) -> Vec<TimedEvent> {
		self.recorded.lock().iter().filter(|timed| timed.event == event).cloned().collect()
	}

	pub fn count(&self, event: PanelEvent) -> usize {
		self.named(event).len()
	}

	pub fn emitted(&self) -> Vec<(PanelEvent, Metadata)> {
		self.emitted.lock().clone()
	}
}

impl Telemetry for FakeTelemetry {
	fn record(&self, event: TimedEvent) {
		self.recorded.lock().push(event);
	}

	fn emit(&self, event: PanelEvent, metadata: &Metadata) {
		self.emitted.lock().push((event, metadata.clone()));
	}
}

#[derive(Default)]
pub(crate) struct FakeEngine {
	requests: Mutex<Vec<SearchRequest>>,
}

impl FakeEngine {
	pub fn requests(&self) -> Vec<SearchRequest> {
		self.requests.lock().clone()
	}
}

impl SearchEngine for FakeEngine {
	fn search_text(&self, request: SearchRequest) {
		self.requests.lock().push(request);
	}
}

#[derive(Default)]
pub(crate) struct FakeHistory {
	added: Mutex<Vec<HistoryRecord>>,
	queries: Mutex<Vec<HistoryQuery>>,
	fail_add: AtomicBool,
}

impl FakeHistory {
	pub fn added(&self) -> Vec<HistoryRecord> {
		self.added.lock().clone()
	}

	pub fn queries(&self) -> Vec<HistoryQuery> {
		self.queries.lock().clone()
	}

	pub fn fail_appends(&self) {
		self.fail_add.store(true, Ordering::SeqCst);
	}
}

#[async_trait]
impl HistoryStore for FakeHistory {
	async fn add_record(&self, record: HistoryRecord) -> Result<()> {
		if self.fail_add.load(Ordering::SeqCst) {
			return Err(Error::Collaborator("history store is read-only".into()));
		}
		self.added.lock().push(record);
		Ok(())
	}

	async fn search_history(&self, query: HistoryQuery) -> Result<Vec<HistoryRecord>> {
		self.queries.lock().push(query);
		Ok(self.added.lock().clone())
	}
}

#[derive(Default)]
pub(crate) struct FakeAutocomplete {
	requests: Mutex<Vec<AutocompleteRequest>>,
}

impl FakeAutocomplete {
	pub fn requests(&self) -> Vec<AutocompleteRequest> {
		self.requests.lock().clone()
	}
}

#[async_trait]
impl AutocompleteProvider for FakeAutocomplete {
	async fn get_autocomplete(&self, request: AutocompleteRequest) -> Result<Vec<AutocompleteSuggestion>> {
		let suggestion = AutocompleteSuggestion {
			suggestion: format!("{} exception", request.input),
		};
		self.requests.lock().push(request);
		Ok(vec![suggestion])
	}
}

#[derive(Default)]
pub(crate) struct FakeNotifier {
	notes: Mutex<Vec<(Severity, String, Option<String>)>>,
}

impl FakeNotifier {
	pub fn notes(&self) -> Vec<(Severity, String, Option<String>)> {
		self.notes.lock().clone()
	}
}

impl Notifier for FakeNotifier {
	fn notify(&self, severity: Severity, message: &str, details: Option<&str>) {
		self.notes.lock().push((severity, message.to_string(), details.map(str::to_string)));
	}
}

#[derive(Default)]
pub(crate) struct FakeOpener {
	opened: Mutex<Vec<String>>,
}

impl FakeOpener {
	pub fn opened(&self) -> Vec<String> {
		self.opened.lock().clone()
	}
}

impl ExternalOpener for FakeOpener {
	fn open_external(&self, url: &str) -> Result<()> {
		self.opened.lock().push(url.to_string());
		Ok(())
	}
}

/// One fake per collaborator, kept around for assertions.
#[derive(Default, Clone)]
pub(crate) struct Fakes {
	pub engine: Arc<FakeEngine>,
	pub surfaces: Arc<FakeSurfaces>,
	pub status_bar: Arc<FakeStatusBar>,
	pub history: Arc<FakeHistory>,
	pub autocomplete: Arc<FakeAutocomplete>,
	pub notifier: Arc<FakeNotifier>,
	pub telemetry: Arc<FakeTelemetry>,
	pub opener: Arc<FakeOpener>,
}

impl Fakes {
	pub fn host(&self) -> Host {
		Host {
			engine: self.engine.clone(),
			surfaces: self.surfaces.clone(),
			status_bar: self.status_bar.clone(),
			history: self.history.clone(),
			autocomplete: self.autocomplete.clone(),
			notifier: self.notifier.clone(),
			telemetry: self.telemetry.clone(),
			opener: self.opener.clone(),
		}
	}

	/// Orchestrator wired to these fakes and the receiving end of its bus.
	pub fn orchestrator(&self) -> (PanelOrchestrator, MsgReceiver) {
		let (tx, rx) = channel();
		(PanelOrchestrator::new(PanelsConfig::default(), self.host(), tx), rx)
	}
}

pub(crate) fn panel(id: &str) -> PanelId {
	PanelId::new(id)
}
