//! Request Generations
//!
//! Every load issues a ticket for its target field. A response is current
//! only if no later ticket was issued for the same target in the meantime.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    generation: u64,
}

/// Latest issued generation per target key
#[derive(Clone, Debug, Default)]
pub struct Generations {
    latest: Rc<RefCell<HashMap<String, u64>>>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, key: &str) -> Ticket {
        let mut latest = self.latest.borrow_mut();
        let generation = latest.entry(key.to_string()).or_insert(0);
        *generation += 1;
        Ticket {
            key: key.to_string(),
            generation: *generation,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.borrow().get(&ticket.key) == Some(&ticket.generation)
    }
}
