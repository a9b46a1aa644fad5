use crate::{Error, Result};

use rowbind_core::stmt::Value;

/// Positional parameters for one statement execution.
///
/// Positions are 1-based, matching the statement's placeholders. Every
/// placeholder must be bound exactly once before the parameters are handed to
/// the driver.
#[derive(Debug)]
pub(super) struct Binds {
    slots: Vec<Option<Value>>,
}

impl Binds {
    pub(super) fn new(placeholders: usize) -> Binds {
        Binds {
            slots: vec![None; placeholders],
        }
    }

    pub(super) fn bind(&mut self, position: usize, value: Value) -> Result<()> {
        let len = self.slots.len();

        match position.checked_sub(1).and_then(|index| self.slots.get_mut(index)) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(Error::persistence(format!(
                "bind position {position} is outside 1..={len}"
            ))),
        }
    }

    pub(super) fn finish(self) -> Result<Vec<Value>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    Error::persistence(format!("bind position {} was never bound", index + 1))
                })
            })
            .collect()
    }
}
