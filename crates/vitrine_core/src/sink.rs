//! Render sink
//!
//! The only side effect an engine performs: writing a slot's computed offset
//! into whatever the host uses as the element's render transform.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives one position per slot per rendered frame
pub trait SlotSink {
    fn set_position(&mut self, index: usize, offset: f32);
}

/// Positions stored by slot index, grown on demand
impl SlotSink for Vec<f32> {
    fn set_position(&mut self, index: usize, offset: f32) {
        if index >= self.len() {
            self.resize(index + 1, 0.0);
        }
        self[index] = offset;
    }
}

/// Shared sink, for hosts that read positions outside the engine
impl<S: SlotSink> SlotSink for Rc<RefCell<S>> {
    fn set_position(&mut self, index: usize, offset: f32) {
        self.borrow_mut().set_position(index, offset);
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F> SlotSink for FnSink<F>
where
    F: FnMut(usize, f32),
{
    fn set_position(&mut self, index: usize, offset: f32) {
        (self.0)(index, offset)
    }
}

/// Discards all writes
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl SlotSink for NullSink {
    fn set_position(&mut self, _index: usize, _offset: f32) {}
}

/// Records every write, in order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSink {
    pub writes: Vec<(usize, f32)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl SlotSink for RecordingSink {
    fn set_position(&mut self, index: usize, offset: f32) {
        self.writes.push((index, offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_grows() {
        let mut sink: Vec<f32> = Vec::new();
        sink.set_position(2, 7.0);
        assert_eq!(sink, vec![0.0, 0.0, 7.0]);
        sink.set_position(0, -1.0);
        assert_eq!(sink, vec![-1.0, 0.0, 7.0]);
    }

    #[test]
    fn test_shared_sink() {
        let shared = Rc::new(RefCell::new(RecordingSink::new()));
        let mut handle = Rc::clone(&shared);
        handle.set_position(0, 1.5);
        assert_eq!(shared.borrow().writes, vec![(0, 1.5)]);
    }

    #[test]
    fn test_fn_sink() {
        let mut total = 0.0f32;
        {
            let mut sink = FnSink(|_: usize, offset: f32| total += offset);
            sink.set_position(0, 2.0);
            sink.set_position(1, 3.0);
        }
        assert_eq!(total, 5.0);
    }
}
