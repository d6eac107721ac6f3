use std::marker::PhantomData;

use crate::errors::*;
use crate::utils::prelude::HandleLike;
use crate::video::assets::prelude::UniformVariableType;

/// Backend-side storage of per-resource data, addressed by the frontend handle.
/// A slot only answers to the exact version it was created with.
#[derive(Debug)]
pub struct DataVec<H, T>
where
    H: HandleLike,
{
    buf: Vec<Option<T>>,
    versions: Vec<u32>,
    _phantom: PhantomData<H>,
}

impl<H, T> DataVec<H, T>
where
    H: HandleLike,
{
    pub fn new() -> Self {
        DataVec {
            buf: Vec::new(),
            versions: Vec::new(),
            _phantom: PhantomData,
        }
    }

    pub fn get(&self, handle: H) -> Option<&T> {
        let index = handle.index() as usize;
        match self.versions.get(index) {
            Some(&v) if v == handle.version() => self.buf[index].as_ref(),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        let index = handle.index() as usize;
        match self.versions.get(index) {
            Some(&v) if v == handle.version() => self.buf[index].as_mut(),
            _ => None,
        }
    }

    pub fn create(&mut self, handle: H, value: T) {
        let index = handle.index() as usize;

        if self.buf.len() <= index {
            self.buf.resize_with(index + 1, || None);
            self.versions.resize(index + 1, 0);
        }

        self.buf[index] = Some(value);
        self.versions[index] = handle.version();
    }

    pub fn free(&mut self, handle: H) -> Option<T> {
        let index = handle.index() as usize;
        match self.versions.get(index) {
            Some(&v) if v == handle.version() => self.buf[index].take(),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.buf.iter().filter(|v| v.is_some()).count()
    }
}

/// Checks a uniform access against the declared type. A `None` declaration is a
/// type the frontend has no variable for, e.g. `vec3` or an array.
pub fn check_uniform_type(
    name: &str,
    declared: Option<UniformVariableType>,
    found: UniformVariableType,
) -> Result<()> {
    match declared {
        Some(expected) if expected == found => Ok(()),
        Some(expected) => Err(Error::UniformTypeMismatch {
            name: name.to_owned(),
            expected,
            found,
        }),
        None => Err(Error::Backend(format!(
            "uniform {} has a type without a matching UniformVariable.",
            name
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::prelude::Handle;

    #[test]
    fn versioned_slots() {
        let mut vec: DataVec<Handle, &'static str> = DataVec::new();
        let h1 = Handle::new(2, 1);
        vec.create(h1, "first");
        assert_eq!(vec.get(h1), Some(&"first"));
        assert_eq!(vec.get(Handle::new(2, 3)), None);
        assert_eq!(vec.get(Handle::new(0, 1)), None);
        assert_eq!(vec.len(), 1);

        assert_eq!(vec.free(Handle::new(2, 3)), None);
        assert_eq!(vec.free(h1), Some("first"));
        assert_eq!(vec.get(h1), None);
        assert_eq!(vec.len(), 0);
    }
}
