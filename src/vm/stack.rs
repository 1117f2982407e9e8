// VM Stack: growable word stack shared by push/pop and call/ret

use super::error::StackError;

/// Last-in-first-out stack of words
#[derive(Debug, Clone, Default)]
pub struct Stack {
    data: Vec<u16>,
}

impl Stack {
    pub fn new() -> Self {
        Stack::default()
    }

    /// Pushes a value onto the stack
    pub fn push(&mut self, value: u16) {
        self.data.push(value);
    }

    /// Pops a value from the stack
    pub fn pop(&mut self) -> Result<u16, StackError> {
        self.data.pop().ok_or(StackError::Underflow)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current stack data (top is last element)
    pub fn view(&self) -> &[u16] {
        &self.data
    }
}
