use crate::BrainfuckError;

/// Default number of cells of a fixed tape.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// How the tape reacts when the data pointer moves past its last cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapePolicy {
    /// A tape with exactly this many cells. Moving past the end is a [`TapeOverflow`](crate::BrainfuckError::TapeOverflow).
    Fixed(usize),
    /// A tape that is extended with zeroed cells as the pointer advances.
    Growable
}

impl Default for TapePolicy {
    fn default() -> Self {
        TapePolicy::Fixed(DEFAULT_TAPE_SIZE)
    }
}

/// Memory of a running program, together with the data pointer.
///
/// Moving the pointer below the first cell is always a [`TapeUnderflow`](crate::BrainfuckError::TapeUnderflow).
/// A failed move leaves the pointer where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    position: usize,
    policy: TapePolicy
}

impl Default for Tape {
    fn default() -> Self {
        Tape::new(TapePolicy::default())
    }
}

impl Tape {

    /// Allocates a zeroed tape.
    /// Panics if the policy asks for a fixed tape of zero cells.
    pub fn new(policy: TapePolicy) -> Tape {
        let cells = match policy {
            TapePolicy::Fixed(0) => panic!("Tape size must be at least 1."),
            TapePolicy::Fixed(size) => vec![0; size],
            TapePolicy::Growable => vec![0]
        };
        Tape {
            cells,
            position: 0,
            policy
        }
    }

    pub fn policy(&self) -> TapePolicy {
        self.policy
    }

    /// All the cells allocated so far.
    pub fn cells(&self) -> &[u8] {
        &*self.cells
    }

    /// Position of the data pointer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Value of the current cell.
    #[inline]
    pub fn get(&self) -> u8 {
        self.cells[self.position]
    }

    #[inline]
    pub fn set(&mut self, value: u8) {
        self.cells[self.position] = value;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.set(0);
    }

    /// Adds `amount` to the current cell, wrapping around 256.
    #[inline]
    pub fn add(&mut self, amount: usize) {
        let value = &mut self.cells[self.position];
        *value = value.wrapping_add(amount as u8);
    }

    /// Subtracts `amount` from the current cell, wrapping around 256.
    #[inline]
    pub fn sub(&mut self, amount: usize) {
        let value = &mut self.cells[self.position];
        *value = value.wrapping_sub(amount as u8);
    }

    pub fn move_right(&mut self, amount: usize) -> Result<(), BrainfuckError> {
        let target = self.position.checked_add(amount).ok_or(BrainfuckError::TapeOverflow)?;
        if target >= self.cells.len() {
            match self.policy {
                TapePolicy::Fixed(_) => return Err(BrainfuckError::TapeOverflow),
                TapePolicy::Growable => {
                    let len = target.checked_add(1).ok_or(BrainfuckError::TapeOverflow)?;
                    trace!("Growing tape to {} cells.", len);
                    self.cells.resize(len, 0);
                }
            }
        }
        self.position = target;
        Ok(())
    }

    pub fn move_left(&mut self, amount: usize) -> Result<(), BrainfuckError> {
        self.position = self.position.checked_sub(amount).ok_or(BrainfuckError::TapeUnderflow)?;
        Ok(())
    }

}
