//! The sampling engine: one owned value driving reads, history, and detection.

use tracing::debug;

use super::detector::{EventDetector, EventLog};
use super::history::{RateTable, SampleHistory, Timeline};
use super::signal::{Signal, Stamp};
use crate::app::MonitorState;
use crate::error::ReadError;
use crate::source::PressureSource;

/// Owns the pressure sources and everything derived from them.
#[derive(Debug)]
pub struct Engine {
    sources: Vec<Box<dyn PressureSource>>,
    histories: Vec<SampleHistory>,
    timeline: Timeline,
    detector: EventDetector,
    log: EventLog,
    rates: Option<RateTable>,
}

impl Engine {
    /// Create an engine over the given sources, one per resource.
    pub fn new(sources: Vec<Box<dyn PressureSource>>) -> Self {
        Self {
            sources,
            histories: vec![SampleHistory::new(); Signal::ALL.len()],
            timeline: Timeline::new(),
            detector: EventDetector::new(),
            log: EventLog::new(),
            rates: None,
        }
    }

    /// Run one sampling cycle at `stamp`.
    ///
    /// All sources are read before anything is recorded, so a failing read
    /// leaves the engine untouched.
    pub fn cycle(&mut self, stamp: Stamp, state: &MonitorState) -> Result<&RateTable, ReadError> {
        let samples = self
            .sources
            .iter_mut()
            .map(|source| source.read())
            .collect::<Result<Vec<_>, _>>()?;

        for sample in &samples {
            for signal in Signal::ALL.iter().filter(|s| s.resource == sample.resource) {
                self.histories[signal.index()].ingest(*sample.get(signal.mode));
            }
        }
        self.timeline.push(stamp);

        let valid = self.timeline.valid_count();
        if valid < self.timeline.len() {
            debug!(valid, kept = self.timeline.len(), "dropping samples before cycle gap");
        }
        self.timeline.truncate(valid);
        for history in &mut self.histories {
            history.truncate(valid);
        }

        let rates = RateTable::compute(&self.histories, &self.timeline);
        let events = self.detector.detect(&stamp, &rates, state.threshold, state.event_interval);
        debug!(samples = valid, events = events.len(), "sampling cycle complete");
        for event in events {
            self.log.push(event);
        }

        Ok(&*self.rates.insert(rates))
    }

    /// Rates from the most recent successful cycle.
    pub fn rates(&self) -> Option<&RateTable> {
        self.rates.as_ref()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn history(&self, signal: Signal) -> &SampleHistory {
        &self.histories[signal.index()]
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn detector(&self) -> &EventDetector {
        &self.detector
    }

    /// Descriptions of the sources, for the status line.
    pub fn source_descriptions(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.description()).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    use crate::app::Threshold;
    use crate::data::history::CYCLE_PERIOD;
    use crate::data::{Mode, Resource, Window};
    use crate::source::parse::parse_pressure;

    /// Replays scripted file contents, one document per read.
    #[derive(Debug)]
    pub(crate) struct ScriptedSource {
        resource: Resource,
        documents: VecDeque<String>,
    }

    impl ScriptedSource {
        pub(crate) fn new(resource: Resource, documents: Vec<String>) -> Self {
            Self {
                resource,
                documents: documents.into(),
            }
        }
    }

    impl PressureSource for ScriptedSource {
        fn resource(&self) -> Resource {
            self.resource
        }

        fn read(&mut self) -> Result<crate::data::ResourceSample, ReadError> {
            let document = self.documents.pop_front().unwrap_or_default();
            parse_pressure(self.resource, self.resource.tag(), &document)
        }

        fn description(&self) -> &str {
            self.resource.tag()
        }
    }

    pub(crate) fn boxed(source: ScriptedSource) -> Box<dyn PressureSource> {
        Box::new(source)
    }

    pub(crate) fn document(some_total: u64, full_total: u64) -> String {
        format!(
            "some avg10=0.00 avg60=4.00 avg300=2.00 total={}\nfull avg10=0.00 avg60=1.00 avg300=0.50 total={}\n",
            some_total, full_total
        )
    }

    /// Engine whose cpu `some` counter grows by `cpu_some_steps[i]` on cycle i.
    pub(crate) fn scripted_engine(cpu_some_steps: &[u64]) -> Engine {
        let mut total = 0u64;
        let cpu = cpu_some_steps
            .iter()
            .map(|step| {
                total += step;
                document(total, 0)
            })
            .collect();
        let quiet = vec![document(0, 0); cpu_some_steps.len()];
        Engine::new(vec![
            boxed(ScriptedSource::new(Resource::Cpu, cpu)),
            boxed(ScriptedSource::new(Resource::Io, quiet.clone())),
            boxed(ScriptedSource::new(Resource::Memory, quiet)),
        ])
    }

    fn state(threshold: u8, window: Window) -> MonitorState {
        MonitorState {
            threshold: Threshold::Percent(threshold),
            event_interval: window,
            ..MonitorState::default()
        }
    }

    const CPU_SOME: Signal = Signal::new(Resource::Cpu, Mode::Some);

    #[test]
    fn test_cycle_computes_rates() {
        // 300ms stalled per second after the first read.
        let mut engine = scripted_engine(&[0, 300_000, 300_000]);
        let base = Stamp::now();
        let state = state(99, Window::S1);

        let rates = engine.cycle(base, &state).unwrap();
        assert_eq!(rates.get(CPU_SOME, Window::S1), None);
        assert_eq!(rates.get(CPU_SOME, Window::S60), Some(4.0));

        engine.cycle(base.advanced(CYCLE_PERIOD), &state).unwrap();
        let rates = engine.cycle(base.advanced(CYCLE_PERIOD * 2), &state).unwrap();
        assert!((rates.get(CPU_SOME, Window::S1).unwrap() - 30.0).abs() < 1e-9);
        assert_eq!(rates.get(CPU_SOME, Window::S3), None);
        assert_eq!(engine.history(CPU_SOME).len(), 3);
    }

    #[test]
    fn test_cycle_fires_and_logs_events() {
        let steps = [0, 100_000, 100_000, 250_000, 250_000, 100_000];
        let mut engine = scripted_engine(&steps);
        let base = Stamp::now();
        let state = state(20, Window::S1);

        for i in 0..steps.len() {
            engine.cycle(base.advanced(CYCLE_PERIOD * i as u32), &state).unwrap();
        }

        // Crossings on cycles 3 and 4; the floor is inclusive after 1s.
        assert_eq!(engine.log().len(), 2);
        assert!(engine.log().iter().all(|e| e.resource == Resource::Cpu));
    }

    #[test]
    fn test_failed_read_leaves_state_untouched() {
        let bad = "some avg10=0.00 avg60=0.00 avg300=0.00 total=5\n".to_string();
        let mut engine = Engine::new(vec![
            boxed(ScriptedSource::new(Resource::Cpu, vec![document(10, 1), document(20, 2)])),
            boxed(ScriptedSource::new(Resource::Io, vec![document(10, 1), bad])),
        ]);
        let base = Stamp::now();
        let state = MonitorState::default();

        engine.cycle(base, &state).unwrap();
        let err = engine.cycle(base.advanced(CYCLE_PERIOD), &state).unwrap_err();
        assert!(matches!(err, ReadError::SchemaMismatch { missing: Mode::Full, .. }));

        assert_eq!(engine.timeline().len(), 1);
        let cpu = engine.history(CPU_SOME);
        assert_eq!(cpu.len(), 1);
        assert_eq!(cpu.latest().unwrap().total_micros, 10);
    }

    #[test]
    fn test_cycle_gap_truncates_all_histories() {
        let mut engine = scripted_engine(&[0, 1, 1, 1, 1]);
        let base = Stamp::now();
        let state = MonitorState::default();

        for i in 0..3 {
            engine.cycle(base.advanced(CYCLE_PERIOD * i), &state).unwrap();
        }
        assert_eq!(engine.timeline().len(), 3);

        // A 5s stall between cycles.
        engine.cycle(base.advanced(Duration::from_secs(7)), &state).unwrap();
        assert_eq!(engine.timeline().len(), 1);
        for signal in Signal::ALL {
            assert_eq!(engine.history(signal).len(), 1);
        }
        assert_eq!(engine.rates().unwrap().get(CPU_SOME, Window::S1), None);
    }
}
