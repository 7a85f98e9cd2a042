//! Listener registry behind the ledger's subscribe/unsubscribe pair.
use crate::models::ProgressState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn Fn(&ProgressState)>;

#[derive(Default)]
pub struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Observers {
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns false when the id was never registered or is already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Calls every listener once, in subscription order.
    pub fn notify(&self, state: &ProgressState) {
        for (_, listener) in &self.listeners {
            listener(state);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_order_and_unsubscribe() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();

        let first = {
            let calls = Rc::clone(&calls);
            observers.subscribe(Box::new(move |_: &ProgressState| calls.borrow_mut().push("first")))
        };
        {
            let calls = Rc::clone(&calls);
            observers.subscribe(Box::new(move |_: &ProgressState| calls.borrow_mut().push("second")));
        }

        observers.notify(&ProgressState::default());
        assert_eq!(*calls.borrow(), vec!["first", "second"]);

        assert!(observers.unsubscribe(first));
        assert!(!observers.unsubscribe(first));
        assert_eq!(observers.len(), 1);

        observers.notify(&ProgressState::default());
        assert_eq!(*calls.borrow(), vec!["first", "second", "second"]);
    }
}
