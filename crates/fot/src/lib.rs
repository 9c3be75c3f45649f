//! The flow-object tree (FOT) sink contract.
//!
//! A formatting backend implements [`FotBuilder`]; the processor drives it
//! through strictly nested `start_*`/`end_*` pairs. [`SaveFotBuilder`] records
//! a call sequence for later replay when the real destination is not yet
//! ready to receive it.

pub mod builder;
pub mod characteristic;
pub mod nic;
pub mod ports;
pub mod save;

pub use builder::{FotBuilder, IgnoreFotBuilder};
pub use characteristic::Characteristic;
pub use nic::{
    AnchorNic, BoxNic, BreakKind, CharacterNic, DisplayNic, ExtensionNic, ExternalGraphicNic,
    GridCellNic, GridNic, LeaderNic, LineFieldNic, LinkAddress, MultiModeMode, ParagraphNic,
    RuleNic, RuleOrientation, ScoreKind, TableCellNic, TableColumnNic, TableNic, TablePartNic,
};
pub use ports::{
    FencePort, FractionPort, HeaderFooterPart, HeaderFooterSlot, MarkPort, MathOperatorPort,
    PageType, RadicalPort, ScriptPort, TablePartPort,
};
pub use save::{FotCommand, SaveFotBuilder};
