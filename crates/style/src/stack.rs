use crate::stylesheet::Style;
use galley_fot::Characteristic;
use std::sync::Arc;

/// One pushed style and the specification level it was pushed at.
#[derive(Debug, Clone)]
pub struct StyleEntry {
    pub style: Arc<Style>,
    pub level: u32,
}

/// The styles in effect at the current point of processing, innermost last.
///
/// Each connection carries its own stack, captured when the connection is
/// opened, so content redirected to a distant port inherits the styles of
/// the point where the port was declared rather than where it was written.
#[derive(Debug, Clone, Default)]
pub struct StyleStack {
    entries: Vec<StyleEntry>,
}

impl StyleStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, style: Arc<Style>, level: u32) {
        self.entries.push(StyleEntry { style, level });
    }

    /// Removes the innermost style.
    ///
    /// # Panics
    /// Panics if the stack is empty; pushes and pops are always paired.
    pub fn pop(&mut self) -> StyleEntry {
        self.entries
            .pop()
            .unwrap_or_else(|| panic!("pop of an empty style stack"))
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&StyleEntry> {
        self.entries.last()
    }

    /// The innermost assignment of a characteristic, if any style sets it.
    pub fn inherited(&self, name: &str) -> Option<&Characteristic> {
        self.entries.iter().rev().find_map(|e| e.style.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherited_lookup_prefers_innermost() {
        let mut stack = StyleStack::new();
        stack.push(
            Arc::new(
                Style::new()
                    .with(Characteristic::FontSize(10.0))
                    .with(Characteristic::Hyphenate(true)),
            ),
            0,
        );
        stack.push(Arc::new(Style::new().with(Characteristic::FontSize(8.0))), 1);
        assert_eq!(stack.inherited("font-size"), Some(&Characteristic::FontSize(8.0)));
        assert_eq!(stack.inherited("hyphenate?"), Some(&Characteristic::Hyphenate(true)));

        let popped = stack.pop();
        assert_eq!(popped.level, 1);
        assert_eq!(stack.inherited("font-size"), Some(&Characteristic::FontSize(10.0)));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    #[should_panic(expected = "empty style stack")]
    fn popping_empty_stack_panics() {
        StyleStack::new().pop();
    }
}
