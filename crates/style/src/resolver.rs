use crate::stack::StyleStack;
use crate::stylesheet::Style;
use galley_fot::FotBuilder;
use std::sync::Arc;

/// Applies styles to a sink as they enter and leave scope.
///
/// `push` happens after a flow object is entered and before its `start_*`
/// call, so the characteristics it sets apply to that flow object. `pop`
/// happens after the matching `end_*`.
pub trait StyleResolver {
    fn push(&self, stack: &mut StyleStack, style: &Arc<Style>, level: u32, sink: &mut dyn FotBuilder);

    fn pop(&self, stack: &mut StyleStack, sink: &mut dyn FotBuilder);
}

/// Issues every characteristic of a pushed style as a `set_*` call.
///
/// Sinks scope inherited characteristics to the enclosing flow object, so
/// nothing needs to be undone on pop.
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritedStyleResolver;

impl StyleResolver for InheritedStyleResolver {
    fn push(&self, stack: &mut StyleStack, style: &Arc<Style>, level: u32, sink: &mut dyn FotBuilder) {
        log::trace!(
            "Pushing style with {} characteristics at level {}",
            style.characteristics().len(),
            level
        );
        for characteristic in style.characteristics() {
            characteristic.apply(sink);
        }
        stack.push(style.clone(), level);
    }

    fn pop(&self, stack: &mut StyleStack, _sink: &mut dyn FotBuilder) {
        stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galley_fot::{Characteristic, FotCommand, SaveFotBuilder};

    #[test]
    fn push_sets_characteristics_in_order() {
        let style = Arc::new(
            Style::new()
                .with(Characteristic::FontSize(9.0))
                .with(Characteristic::Language(None)),
        );
        let mut stack = StyleStack::new();
        let mut sink = SaveFotBuilder::new();
        InheritedStyleResolver.push(&mut stack, &style, 2, &mut sink);
        assert_eq!(
            sink.commands(),
            &[
                FotCommand::Set(Characteristic::FontSize(9.0)),
                FotCommand::Set(Characteristic::Language(None)),
            ]
        );
        assert_eq!(stack.top().map(|e| e.level), Some(2));

        InheritedStyleResolver.pop(&mut stack, &mut sink);
        assert!(stack.is_empty());
        assert_eq!(sink.len(), 2);
    }
}
