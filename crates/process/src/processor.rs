use crate::config::ProcessConfig;
use crate::context::ProcessContext;
use crate::diagnostic::Messenger;
use crate::error::{ConfigError, ProcessError};
use crate::rule::{Mode, RuleMatcher, RuleTable};
use galley_fot::FotBuilder;
use galley_grove::GroveNode;
use galley_style::{InheritedStyleResolver, Style, StyleResolver, Stylesheet};
use serde::Serialize;
use std::sync::Arc;

/// Counters gathered over one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub nodes_processed: usize,
    /// Deepest nesting of guarded process-node calls.
    pub max_guard_depth: usize,
    /// Recorders created to hold content for a busy port or a principal
    /// port further out.
    pub deferred_recorders: usize,
    pub filler_rows: usize,
    pub span_reconciliations: usize,
    pub diagnostics: usize,
}

/// Builds a [`Processor`].
///
/// ```rust
/// use galley_process::{Processor, RuleTable, Sosofo};
/// use galley_grove::testing::GroveRef;
///
/// let processor = Processor::<GroveRef<'_>>::builder()
///     .with_matcher(RuleTable::new().element("para", Sosofo::process_children()))
///     .build()
///     .unwrap();
/// assert!(!processor.config().strict);
/// ```
pub struct ProcessorBuilder<'r, N> {
    matcher: Option<Box<dyn RuleMatcher<N> + 'r>>,
    resolver: Option<Box<dyn StyleResolver + 'r>>,
    stylesheet: Stylesheet,
    initial_style: Option<Arc<Style>>,
    config: ProcessConfig,
}

impl<'r, N: GroveNode + 'r> Default for ProcessorBuilder<'r, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r, N: GroveNode + 'r> ProcessorBuilder<'r, N> {
    pub fn new() -> Self {
        Self {
            matcher: None,
            resolver: None,
            stylesheet: Stylesheet::default(),
            initial_style: None,
            config: ProcessConfig::default(),
        }
    }

    pub fn with_matcher(mut self, matcher: impl RuleMatcher<N> + 'r) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    pub fn with_resolver(mut self, resolver: impl StyleResolver + 'r) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Named styles available to `initial_style` in the configuration.
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// A style wrapped around the whole output. Takes precedence over a
    /// style named in the configuration.
    pub fn with_initial_style(mut self, style: Arc<Style>) -> Self {
        self.initial_style = Some(style);
        self
    }

    pub fn with_config(mut self, config: ProcessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    pub fn build(self) -> Result<Processor<'r, N>, ProcessError> {
        let initial_style = match (self.initial_style, &self.config.initial_style) {
            (Some(style), _) => Some(style),
            (None, Some(name)) => Some(
                self.stylesheet
                    .get_style(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownStyle(name.clone()))?,
            ),
            (None, None) => None,
        };
        let matcher: Box<dyn RuleMatcher<N> + 'r> = match self.matcher {
            Some(matcher) => matcher,
            None => {
                log::warn!("No rule matcher configured; every node will process its children");
                Box::new(RuleTable::<N>::new())
            }
        };
        let resolver: Box<dyn StyleResolver + 'r> = match self.resolver {
            Some(resolver) => resolver,
            None => Box::new(InheritedStyleResolver),
        };
        log::info!(
            "Processor configured (strict: {}, node guard: {}, filler rows: {})",
            self.config.strict,
            self.config.guard_process_node,
            self.config.synthesize_filler_rows
        );
        Ok(Processor {
            matcher,
            resolver,
            initial_style,
            config: self.config,
        })
    }
}

/// Drives a grove through construction rules into a sink.
pub struct Processor<'r, N> {
    matcher: Box<dyn RuleMatcher<N> + 'r>,
    resolver: Box<dyn StyleResolver + 'r>,
    initial_style: Option<Arc<Style>>,
    config: ProcessConfig,
}

impl<'r, N: GroveNode + 'r> Processor<'r, N> {
    pub fn builder() -> ProcessorBuilder<'r, N> {
        ProcessorBuilder::new()
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Processes `root` in the configured initial mode.
    ///
    /// Diagnostics go to `messenger` as they happen; output always runs to
    /// completion. In strict mode a run that reported errors then fails.
    pub fn process(
        &self,
        root: &N,
        sink: &mut dyn FotBuilder,
        messenger: &mut dyn Messenger,
    ) -> Result<ProcessStats, ProcessError> {
        let mut cx = ProcessContext::new(
            self.matcher.as_ref(),
            self.resolver.as_ref(),
            &self.config,
            sink,
            messenger,
        );
        let mode = Mode::named(self.config.initial_mode.as_str());
        if let Some(style) = &self.initial_style {
            cx.push_style(style);
            cx.sink().start_sequence();
        }
        cx.process_node(root, &mode, self.config.chunk_text);
        if self.initial_style.is_some() {
            cx.sink().end_sequence();
            cx.pop_style();
        }
        let (stats, errors) = cx.finish();
        log::debug!(
            "Processed {} nodes with {} diagnostics ({} errors)",
            stats.nodes_processed,
            stats.diagnostics,
            errors
        );
        if self.config.strict && errors > 0 {
            return Err(ProcessError::Diagnostics { errors, stats });
        }
        Ok(stats)
    }
}
