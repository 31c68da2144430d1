use super::Val;
use std::rc::Rc;
use tracing::debug;

/// Heap-allocated payload referenced from a `Val`.
#[derive(Debug, PartialEq)]
pub enum Object {
    String(String),
}

impl std::fmt::Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Object::String(s) => write!(f, "{}", s),
        }
    }
}

/// ## Heap object registry
///
/// Every object is registered here when it is created and only released
/// in bulk by `free_objects`. There is no collector.
///
/// A `Val` holds a counted handle to its object, so a value that outlives
/// a bulk free (a global kept across interactive lines, for example) keeps
/// its payload alive instead of dangling.
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<Rc<Object>>,
}

impl Heap {
    pub fn new() -> Heap {
        Heap::default()
    }

    pub fn alloc_string(&mut self, s: String) -> Val {
        let obj = Rc::new(Object::String(s));
        self.objects.push(Rc::clone(&obj));
        Val::Object(obj)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Releases the registry's hold on every object. Returns how many were registered.
    pub fn free_objects(&mut self) -> usize {
        let count = self.objects.len();
        self.objects.clear();
        debug!(count, "freed heap objects");
        count
    }
}
