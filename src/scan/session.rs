//! Scan driver: parallel decode, serialized link, extended-scan waves.

use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::{
    classfile::{
        decoder::{DecodedUnit, ScanPolicy, UnitDecoder},
        diagnostics::{DiagnosticCategory, Diagnostics},
    },
    graph::{query::CancellationToken, ClassGraph, GraphLinker},
    scan::ScanContext,
    ByteSource, Error, Result, SkipReason,
};

/// What one decode worker produced for one source
struct Decoded {
    label: String,
    result: Result<DecodedUnit>,
    scheduled: Vec<Box<dyn ByteSource>>,
}

#[derive(Default)]
struct Outcomes {
    linked: usize,
    failures: Vec<(String, Error)>,
    skips: Vec<(String, SkipReason)>,
    conflicts: Vec<Error>,
}

/// Outcome of a finished scan
pub struct ScanReport {
    /// The linked class graph
    pub graph: ClassGraph,
    /// Number of units linked into the graph, external ones included
    pub linked: usize,
    /// Units that failed to decode or link, labelled by source
    pub failures: Vec<(String, Error)>,
    /// Units deliberately excluded, labelled by source
    pub skips: Vec<(String, SkipReason)>,
    /// [`Error::LinkConflict`]s of masked duplicate definitions, in link order
    pub conflicts: Vec<Error>,
    context: Arc<ScanContext>,
}

impl ScanReport {
    /// Everything reported while decoding and linking.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.context.diagnostics
    }

    /// Returns `true` if nothing failed and nothing was masked.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.conflicts.is_empty()
    }
}

/// Drives one scan from byte sources to a finished [`ClassGraph`]
///
/// Each call to [`ScanSession::scan`] decodes its batch on the rayon pool, one reusable
/// [`UnitDecoder`] per worker, then links the results in input order under the session's
/// merge lock. With [`ScanPolicy::extend_scanning`] the types the decoders scheduled are
/// decoded and linked as a further wave, repeated until no new type is scheduled.
///
/// Failures never abort the scan: every unit that cannot be decoded or linked ends up in
/// the [`ScanReport`], and the rest of the batch carries on.
///
/// # Examples
///
/// ```rust,no_run
/// use classscope::prelude::*;
///
/// let sources: Vec<Box<dyn ByteSource>> = vec![
///     Box::new(Physical::new("classes/com/example/Foo.class")?),
///     Box::new(Physical::new("classes/com/example/Bar.class")?),
/// ];
///
/// let session = ScanSession::new(ScanPolicy::default());
/// session.scan(sources)?;
/// let report = session.finish()?;
/// println!("{} types, {} failures", report.graph.type_count(), report.failures.len());
/// # Ok::<(), classscope::Error>(())
/// ```
pub struct ScanSession {
    context: Arc<ScanContext>,
    policy: ScanPolicy,
    linker: Mutex<GraphLinker>,
    outcomes: Mutex<Outcomes>,
    cancellation: Option<CancellationToken>,
}

impl ScanSession {
    /// Session with a fresh context.
    #[must_use]
    pub fn new(policy: ScanPolicy) -> Self {
        Self::with_context(policy, Arc::new(ScanContext::new()))
    }

    /// Session sharing `context`, e.g. one carrying an external scheduler.
    #[must_use]
    pub fn with_context(policy: ScanPolicy, context: Arc<ScanContext>) -> Self {
        ScanSession {
            linker: Mutex::new(GraphLinker::with_context(Arc::clone(&context))),
            context,
            policy,
            outcomes: Mutex::new(Outcomes::default()),
            cancellation: None,
        }
    }

    /// Stop between waves once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The shared scan state.
    #[must_use]
    pub fn context(&self) -> &Arc<ScanContext> {
        &self.context
    }

    /// The policy every decode of this session uses.
    #[must_use]
    pub fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    /// Decode and link one batch of sources, followed by any extended-scan waves.
    ///
    /// # Errors
    /// - [`Error::Cancelled`] if the session's token fired; units linked so far stay linked
    /// - [`Error::LockError`] if a previous scan panicked while holding the merge lock
    pub fn scan(&self, sources: Vec<Box<dyn ByteSource>>) -> Result<()> {
        let labels: Vec<String> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| label(source.as_ref(), index))
            .collect();
        let mut wave = self.decode_wave(&sources, labels);
        let mut depth = 0;

        loop {
            if let Some(scheduler) = &self.context.scheduler {
                for decoded in &wave {
                    if let Ok(unit) = &decoded.result {
                        scheduler.mark_seen(&unit.name);
                    }
                }
            }

            let next = self.link_wave(wave, depth > 0)?;
            if next.is_empty() {
                break;
            }
            if let Some(token) = &self.cancellation {
                token.check()?;
            }

            depth += 1;
            tracing::debug!("Extended scan wave {} with {} types", depth, next.len());
            let labels = (0..next.len())
                .map(|index| format!("external #{depth}.{index}"))
                .collect();
            wave = self.decode_wave(&next, labels);
        }

        Ok(())
    }

    /// Close the session and hand out the report.
    ///
    /// # Errors
    /// Returns [`Error::LockError`] if a scan panicked while holding a session lock.
    pub fn finish(self) -> Result<ScanReport> {
        let linker = self.linker.into_inner().map_err(|_| Error::LockError)?;
        let outcomes = self.outcomes.into_inner().map_err(|_| Error::LockError)?;
        let graph = linker.finish();

        tracing::info!(
            "Scan finished: {} linked, {} failed, {} skipped, {} masked",
            outcomes.linked,
            outcomes.failures.len(),
            outcomes.skips.len(),
            outcomes.conflicts.len()
        );

        Ok(ScanReport {
            graph,
            linked: outcomes.linked,
            failures: outcomes.failures,
            skips: outcomes.skips,
            conflicts: outcomes.conflicts,
            context: self.context,
        })
    }

    fn decode_wave(&self, sources: &[Box<dyn ByteSource>], labels: Vec<String>) -> Vec<Decoded> {
        let policy = &self.policy;
        let context = self.context.as_ref();

        sources
            .par_iter()
            .zip(labels)
            .map_init(UnitDecoder::new, |decoder, (source, label)| {
                let result = decoder.decode(source.as_ref(), policy, context);
                Decoded {
                    label,
                    result,
                    scheduled: decoder.drain_scheduled(),
                }
            })
            .collect()
    }

    /// Link one decoded wave in order; returns the sources scheduled while decoding it.
    fn link_wave(&self, wave: Vec<Decoded>, external: bool) -> Result<Vec<Box<dyn ByteSource>>> {
        let mut linker = lock!(self.linker)?;
        let mut outcomes = lock!(self.outcomes)?;
        let mut next = Vec::new();

        for decoded in wave {
            next.extend(decoded.scheduled);

            let unit = match decoded.result {
                Ok(unit) => unit,
                Err(Error::Skipped(reason)) => {
                    tracing::trace!("Skipped {}: {}", decoded.label, reason);
                    outcomes.skips.push((decoded.label, reason));
                    continue;
                }
                Err(error) => {
                    tracing::debug!("Failed to decode {}: {}", decoded.label, error);
                    self.context.diagnostics.error(
                        DiagnosticCategory::ClassFile,
                        format!("{}: {}", decoded.label, error),
                    );
                    outcomes.failures.push((decoded.label, error));
                    continue;
                }
            };

            // Types requested by several decoders of one wave may arrive more than once
            if external
                && linker
                    .graph()
                    .type_by_name(&unit.name)
                    .is_some_and(|node| !node.is_placeholder())
            {
                continue;
            }

            let name = unit.name.to_string();
            match linker.link(unit) {
                Ok(_) => outcomes.linked += 1,
                Err(error @ Error::LinkConflict { .. }) => outcomes.conflicts.push(error),
                Err(error) => outcomes.failures.push((name, error)),
            }
        }

        Ok(next)
    }
}

fn label(source: &dyn ByteSource, index: usize) -> String {
    match source.classpath_element() {
        Some(element) => format!("{element} #{index}"),
        None => format!("#{index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::{query::QueryEngine, RelationshipKind},
        scan::{DedupScheduler, MemoryLocator},
        test::ClassFileBuilder,
        FailureKind, Memory,
    };

    fn source(builder: ClassFileBuilder, element: &str) -> Box<dyn ByteSource> {
        Box::new(Memory::new(builder.build()).with_classpath_element(element))
    }

    #[test]
    fn scans_a_batch() {
        let session = ScanSession::new(ScanPolicy::default());
        session
            .scan(vec![
                source(ClassFileBuilder::new("a/Foo").superclass("a/Bar"), "app.jar"),
                source(ClassFileBuilder::new("a/Bar"), "app.jar"),
                source(ClassFileBuilder::new("java/lang/Object").no_superclass(), "rt.jar"),
                Box::new(Memory::new(vec![0xDE, 0xAD, 0xBE, 0xEF])),
                Box::new(Memory::new(Vec::new())),
            ])
            .unwrap();

        let report = session.finish().unwrap();
        assert_eq!(report.linked, 2);
        assert_eq!(report.skips, vec![("rt.jar #2".to_string(), SkipReason::RootObjectType)]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].0, "#3");
        assert_eq!(report.failures[0].1.kind(), FailureKind::MalformedFormat);
        assert!(!report.is_clean());
        assert!(report.diagnostics().has_errors());

        let engine = QueryEngine::new(&report.graph);
        let subclasses = engine
            .related_by_name("a.Bar", RelationshipKind::Subclasses)
            .unwrap();
        assert_eq!(subclasses.names(), vec!["a.Foo"]);
    }

    #[test]
    fn duplicates_are_masked_in_input_order() {
        let session = ScanSession::new(ScanPolicy::default());
        let batch = (0..8)
            .map(|i| source(ClassFileBuilder::new("a/Dup"), &format!("lib{i}.jar")))
            .collect();
        session.scan(batch).unwrap();

        let report = session.finish().unwrap();
        assert_eq!(report.linked, 1);
        assert_eq!(report.conflicts.len(), 7);
        let details = report.graph.type_by_name("a.Dup").unwrap().details().unwrap();
        assert_eq!(details.classpath_element.as_deref(), Some("lib0.jar"));
        match &report.conflicts[0] {
            Error::LinkConflict { kept, rejected, .. } => {
                assert_eq!(kept, "lib0.jar");
                assert_eq!(rejected, "lib1.jar");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn extended_scanning_follows_references() {
        let mut locator = MemoryLocator::new();
        locator.insert(
            "lib.Base",
            Memory::new(ClassFileBuilder::new("lib/Base").superclass("lib/Root").build()),
        );
        locator.insert("lib.Root", Memory::new(ClassFileBuilder::new("lib/Root").build()));
        locator.insert("a.Local", Memory::new(ClassFileBuilder::new("a/Local").build()));

        let context = ScanContext::new().with_scheduler(Arc::new(DedupScheduler::new(locator)));
        let session = ScanSession::with_context(ScanPolicy::external(), Arc::new(context));
        session
            .scan(vec![
                source(ClassFileBuilder::new("a/App").superclass("lib/Base"), "app.jar"),
                source(ClassFileBuilder::new("a/Other").superclass("a/Local"), "app.jar"),
                source(ClassFileBuilder::new("a/Local"), "app.jar"),
            ])
            .unwrap();

        let report = session.finish().unwrap();
        assert!(report.is_clean(), "{:?}", report.conflicts);
        assert_eq!(report.linked, 5);
        assert!(!report.graph.type_by_name("lib.Root").unwrap().is_placeholder());

        let engine = QueryEngine::new(&report.graph);
        let supers = engine
            .related_by_name("a.App", RelationshipKind::Superclasses)
            .unwrap();
        assert_eq!(supers.names(), vec!["java.lang.Object", "lib.Base", "lib.Root"]);
    }

    #[test]
    fn cancelled_between_waves() {
        let mut locator = MemoryLocator::new();
        locator.insert("lib.Base", Memory::new(ClassFileBuilder::new("lib/Base").build()));
        let context = ScanContext::new().with_scheduler(Arc::new(DedupScheduler::new(locator)));

        let token = CancellationToken::new();
        token.cancel();
        let session = ScanSession::with_context(ScanPolicy::external(), Arc::new(context))
            .with_cancellation(token);
        let result = session.scan(vec![source(
            ClassFileBuilder::new("a/App").superclass("lib/Base"),
            "app.jar",
        )]);
        assert!(matches!(result, Err(Error::Cancelled)));

        let report = session.finish().unwrap();
        assert_eq!(report.linked, 1);
        assert!(report.graph.type_by_name("lib.Base").unwrap().is_placeholder());
    }
}
