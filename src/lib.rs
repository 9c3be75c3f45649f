//! galley: the core of a DSSSL-style formatting processor.
//!
//! A grove is walked node by node; each node's construction rule yields a
//! sosofo, which is interpreted into calls on a formatting sink. The crates
//! of the workspace split this up:
//!
//! * [`types`]: names, node identities and characteristic values
//! * [`grove`]: the read-only source tree contract
//! * [`fot`]: the sink contract and the recorder used for deferred output
//! * [`style`]: styles, the style stack and how styles reach the sink
//! * [`process`]: the driver, port connections and table state
//!
//! ```rust
//! use galley::grove::testing::GroveBuilder;
//! use galley::fot::SaveFotBuilder;
//! use galley::{CollectingMessenger, FlowObject, FlowObjectKind, Processor, RuleTable};
//!
//! let grove = GroveBuilder::new()
//!     .element("doc", |b| b.element("para", |b| b.text("Hello")))
//!     .finish();
//! let rules = RuleTable::new().element(
//!     "para",
//!     FlowObject::new(FlowObjectKind::Sequence).into_sosofo(),
//! );
//! let processor = Processor::builder().with_matcher(rules).build().unwrap();
//!
//! let mut sink = SaveFotBuilder::new();
//! let mut messenger = CollectingMessenger::new();
//! let stats = processor.process(&grove.root(), &mut sink, &mut messenger).unwrap();
//! assert_eq!(stats.nodes_processed, 4);
//! assert!(messenger.is_empty());
//! ```

pub use galley_fot as fot;
pub use galley_grove as grove;
pub use galley_process as process;
pub use galley_style as style;
pub use galley_types as types;

pub use galley_fot::{FotBuilder, SaveFotBuilder};
pub use galley_grove::GroveNode;
pub use galley_process::{
    CollectingMessenger, ConfigError, ContentMap, Diagnostic, DiagnosticKind, FlowObject,
    FlowObjectKind, LogMessenger, Messenger, Mode, ProcessConfig, ProcessError, ProcessStats,
    Processor, ProcessorBuilder, Rule, RuleMatcher, RulePattern, RuleTable, Sosofo,
};
pub use galley_style::{Style, Stylesheet};

/// Loads a configuration and a stylesheet from JSON and builds a processor
/// around `matcher`.
pub fn processor_from_json<'r, N, M>(
    matcher: M,
    config_json: &str,
    stylesheet_json: &str,
) -> Result<Processor<'r, N>, ProcessError>
where
    N: GroveNode + 'r,
    M: RuleMatcher<N> + 'r,
{
    let config = ProcessConfig::from_json(config_json)?;
    let stylesheet = Stylesheet::from_json(stylesheet_json).map_err(ConfigError::from)?;
    log::debug!(
        "Building processor with {} named styles",
        stylesheet.styles.len()
    );
    Processor::builder()
        .with_config(config)
        .with_stylesheet(stylesheet)
        .with_matcher(matcher)
        .build()
}
