//! Delivers a chosen result to the host exactly once
//!
//! The transient search state is torn down before the host callback runs,
//! so nothing the callback observes can still dispatch the same item.

use crate::data::ResultItem;
use tracing::info;

/// Host hook invoked with the selected item
pub type SelectionCallback = Box<dyn FnMut(ResultItem)>;

/// The pieces of widget state a selection has to reset, in dispatch order
pub trait SelectionTarget {
    fn hide_results(&mut self);
    fn clear_query(&mut self);
    fn reset_cursor(&mut self);
}

#[derive(Default)]
pub struct ResultSelectionDispatcher {
    callback: Option<SelectionCallback>,
    dispatched: u64,
}

impl ResultSelectionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: impl FnMut(ResultItem) + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
            dispatched: 0,
        }
    }

    /// Install (or replace) the host's "result selected" hook
    pub fn on_result_selected(&mut self, callback: impl FnMut(ResultItem) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Number of selections delivered so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn dispatch(&mut self, target: &mut dyn SelectionTarget, item: ResultItem) {
        target.hide_results();
        target.clear_query();
        target.reset_cursor();

        self.dispatched += 1;
        info!(
            target: "selection",
            "Dispatching {} '{}' ({})",
            item.category.label(),
            item.display_name,
            item.id
        );

        if let Some(callback) = self.callback.as_mut() {
            callback(item);
        }
    }
}

impl std::fmt::Debug for ResultSelectionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSelectionDispatcher")
            .field("has_callback", &self.callback.is_some())
            .field("dispatched", &self.dispatched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Category;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl SelectionTarget for Recorder {
        fn hide_results(&mut self) {
            self.log.borrow_mut().push("hide".into());
        }
        fn clear_query(&mut self) {
            self.log.borrow_mut().push("clear".into());
        }
        fn reset_cursor(&mut self) {
            self.log.borrow_mut().push("cursor".into());
        }
    }

    #[test]
    fn test_state_reset_before_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let callback_log = log.clone();
        let mut dispatcher = ResultSelectionDispatcher::with_callback(move |item: ResultItem| {
            callback_log.borrow_mut().push(format!("callback:{}", item.id));
        });

        let mut target = Recorder { log: log.clone() };
        dispatcher.dispatch(
            &mut target,
            ResultItem::new("p1", "Anita Sharma", "", Category::Patient),
        );

        assert_eq!(
            *log.borrow(),
            vec!["hide", "clear", "cursor", "callback:p1"]
        );
        assert_eq!(dispatcher.dispatched(), 1);
    }

    #[test]
    fn test_dispatch_without_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = ResultSelectionDispatcher::new();
        let mut target = Recorder { log: log.clone() };
        dispatcher.dispatch(
            &mut target,
            ResultItem::new("a1", "Follow-up", "", Category::Appointment),
        );
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(dispatcher.dispatched(), 1);
    }
}
