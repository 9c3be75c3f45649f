//! Port slots of the multi-port flow objects.
//!
//! Each enum lists its slots in the order a serial sink receives them, and
//! names them with the port names content maps and labels refer to.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TablePartPort {
    Header,
    Footer,
}

impl TablePartPort {
    pub const ALL: [TablePartPort; 2] = [TablePartPort::Header, TablePartPort::Footer];

    pub fn name(self) -> &'static str {
        match self {
            TablePartPort::Header => "header",
            TablePartPort::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FractionPort {
    Numerator,
    Denominator,
}

impl FractionPort {
    pub const ALL: [FractionPort; 2] = [FractionPort::Numerator, FractionPort::Denominator];

    pub fn name(self) -> &'static str {
        match self {
            FractionPort::Numerator => "numerator",
            FractionPort::Denominator => "denominator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptPort {
    PreSup,
    PreSub,
    PostSup,
    PostSub,
    MidSup,
    MidSub,
}

impl ScriptPort {
    pub const ALL: [ScriptPort; 6] = [
        ScriptPort::PreSup,
        ScriptPort::PreSub,
        ScriptPort::PostSup,
        ScriptPort::PostSub,
        ScriptPort::MidSup,
        ScriptPort::MidSub,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScriptPort::PreSup => "pre-sup",
            ScriptPort::PreSub => "pre-sub",
            ScriptPort::PostSup => "post-sup",
            ScriptPort::PostSub => "post-sub",
            ScriptPort::MidSup => "mid-sup",
            ScriptPort::MidSub => "mid-sub",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkPort {
    OverMark,
    UnderMark,
}

impl MarkPort {
    pub const ALL: [MarkPort; 2] = [MarkPort::OverMark, MarkPort::UnderMark];

    pub fn name(self) -> &'static str {
        match self {
            MarkPort::OverMark => "over-mark",
            MarkPort::UnderMark => "under-mark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FencePort {
    Open,
    Close,
}

impl FencePort {
    pub const ALL: [FencePort; 2] = [FencePort::Open, FencePort::Close];

    pub fn name(self) -> &'static str {
        match self {
            FencePort::Open => "open",
            FencePort::Close => "close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadicalPort {
    Degree,
}

impl RadicalPort {
    pub const ALL: [RadicalPort; 1] = [RadicalPort::Degree];

    pub fn name(self) -> &'static str {
        "degree"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathOperatorPort {
    Operator,
    LowerLimit,
    UpperLimit,
}

impl MathOperatorPort {
    pub const ALL: [MathOperatorPort; 3] = [
        MathOperatorPort::Operator,
        MathOperatorPort::LowerLimit,
        MathOperatorPort::UpperLimit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MathOperatorPort::Operator => "operator",
            MathOperatorPort::LowerLimit => "lower-limit",
            MathOperatorPort::UpperLimit => "upper-limit",
        }
    }
}

/// Which kind of page a header or footer is being generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PageType {
    pub first: bool,
    pub front: bool,
}

impl PageType {
    /// The four page types, in the order their headers and footers are emitted.
    pub const ALL: [PageType; 4] = [
        PageType::from_bits(0),
        PageType::from_bits(1),
        PageType::from_bits(2),
        PageType::from_bits(3),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self {
            first: bits & HeaderFooterSlot::FIRST != 0,
            front: bits & HeaderFooterSlot::FRONT != 0,
        }
    }

    pub const fn bits(self) -> u32 {
        (if self.first { HeaderFooterSlot::FIRST } else { 0 })
            | (if self.front { HeaderFooterSlot::FRONT } else { 0 })
    }
}

/// The six header/footer parts of a simple page sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderFooterPart {
    LeftHeader,
    LeftFooter,
    CenterHeader,
    CenterFooter,
    RightHeader,
    RightFooter,
}

impl HeaderFooterPart {
    pub const ALL: [HeaderFooterPart; 6] = [
        HeaderFooterPart::LeftHeader,
        HeaderFooterPart::LeftFooter,
        HeaderFooterPart::CenterHeader,
        HeaderFooterPart::CenterFooter,
        HeaderFooterPart::RightHeader,
        HeaderFooterPart::RightFooter,
    ];

    /// Footer bit in bit 0, position (left/center/right) in bits 1-2.
    pub const fn index(self) -> u32 {
        match self {
            HeaderFooterPart::LeftHeader => 0,
            HeaderFooterPart::LeftFooter => 1,
            HeaderFooterPart::CenterHeader => 2,
            HeaderFooterPart::CenterFooter => 3,
            HeaderFooterPart::RightHeader => 4,
            HeaderFooterPart::RightFooter => 5,
        }
    }
}

/// One of the 24 header/footer slots: page type crossed with part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeaderFooterSlot(u32);

impl HeaderFooterSlot {
    pub const FIRST: u32 = 0o1;
    pub const FRONT: u32 = 0o2;
    pub const HEADER: u32 = 0;
    pub const FOOTER: u32 = 0o4;
    pub const LEFT: u32 = 0;
    pub const CENTER: u32 = 0o10;
    pub const RIGHT: u32 = 0o20;
    pub const COUNT: usize = 24;

    pub const fn new(page_type: PageType, part: HeaderFooterPart) -> Self {
        Self(page_type.bits() | (part.index() << 2))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn page_type(self) -> PageType {
        PageType::from_bits(self.0 & 0o3)
    }

    pub const fn is_footer(self) -> bool {
        self.0 & Self::FOOTER != 0
    }

    /// All slots in emission order: page types outermost, parts innermost.
    pub fn all() -> impl Iterator<Item = HeaderFooterSlot> {
        PageType::ALL.into_iter().flat_map(|page_type| {
            HeaderFooterPart::ALL
                .into_iter()
                .map(move |part| HeaderFooterSlot::new(page_type, part))
        })
    }
}

impl fmt::Display for HeaderFooterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hf{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_footer_slots_cover_all_24_indices_once() {
        let mut seen: Vec<usize> = HeaderFooterSlot::all().map(|s| s.index()).collect();
        assert_eq!(seen.len(), HeaderFooterSlot::COUNT);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn slot_bits_follow_part_layout() {
        let first_front = PageType {
            first: true,
            front: true,
        };
        let slot = HeaderFooterSlot::new(first_front, HeaderFooterPart::RightFooter);
        assert_eq!(
            slot.bits(),
            HeaderFooterSlot::FIRST
                | HeaderFooterSlot::FRONT
                | HeaderFooterSlot::FOOTER
                | HeaderFooterSlot::RIGHT
        );
        assert!(slot.is_footer());
        assert_eq!(slot.page_type(), first_front);

        let center = HeaderFooterSlot::new(PageType::default(), HeaderFooterPart::CenterHeader);
        assert_eq!(center.bits(), HeaderFooterSlot::CENTER);
        assert!(!center.is_footer());
    }

    #[test]
    fn port_names_are_distinct() {
        let names: Vec<&str> = ScriptPort::ALL.iter().map(|p| p.name()).collect();
        let mut dedup = names.clone();
        dedup.dedup();
        assert_eq!(names, dedup);
        assert_eq!(FractionPort::Denominator.name(), "denominator");
    }
}
