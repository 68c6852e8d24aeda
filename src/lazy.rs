use std::sync::OnceLock;

use append_only_vec::AppendOnlyVec;

///
/// Vector whose elements are initialized lazily, at arbitrary indices, and
/// never modified afterwards. Used for index-addressed caches that live as
/// long as their owner, e.g. the generator cache of an algebra.
/// 
#[stability::unstable(feature = "enable")]
pub struct LazyVec<T> {
    data: AppendOnlyVec<OnceLock<T>>
}

impl<T> LazyVec<T> {

    #[stability::unstable(feature = "enable")]
    pub fn new() -> Self {
        Self {
            data: AppendOnlyVec::new()
        }
    }

    #[stability::unstable(feature = "enable")]
    pub fn get(&self, i: usize) -> Option<&T> {
        if i < self.data.len() {
            self.data[i].get()
        } else {
            None
        }
    }

    #[stability::unstable(feature = "enable")]
    pub fn get_or_init<'a, F>(&'a self, i: usize, init: F) -> &'a T
        where F: FnOnce() -> T
    {
        while self.data.len() <= i {
            _ = self.data.push(OnceLock::new());
        }
        return self.data[i].get_or_init(init);
    }
}

impl<T> Clone for LazyVec<T>
    where T: Clone
{
    fn clone(&self) -> Self {
        let data = AppendOnlyVec::new();
        for entry in self.data.iter() {
            let copy = OnceLock::new();
            if let Some(value) = entry.get() {
                _ = copy.set(value.clone());
            }
            _ = data.push(copy);
        }
        return Self { data };
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_get_or_init() {
        let vec: LazyVec<usize> = LazyVec::new();
        assert_eq!(None, vec.get(2));
        assert_eq!(&4, vec.get_or_init(2, || 4));
        assert_eq!(&4, vec.get_or_init(2, || unreachable!()));
        assert_eq!(Some(&4), vec.get(2));
        assert_eq!(None, vec.get(0));
    }

    #[test]
    fn test_clone_keeps_initialized_entries() {
        let vec: LazyVec<usize> = LazyVec::new();
        vec.get_or_init(1, || 10);
        let copy = vec.clone();
        assert_eq!(Some(&10), copy.get(1));
        assert_eq!(None, copy.get(0));
    }
}
