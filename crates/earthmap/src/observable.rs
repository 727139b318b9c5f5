/// A value that counts its effective writes.
///
/// Debug bindings write through `set`; the renderer compares `revision`
/// between frames instead of diffing the value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observable<T> {
    value: T,
    revision: u64,
}

impl<T: Copy + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self { value, revision: 0 }
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// Stores `value`; the revision only moves when it differs from the
    /// current one.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.revision += 1;
        true
    }

    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.value;
        f(&mut next);
        self.set(next)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
