use std::{
    cell::{Cell, RefCell},
    fmt, mem,
    rc::Rc,
};

use crate::{Closure, Value};

/// One named slot. Bindings are never overwritten by a declaration, only by assignment.
pub struct Binding {
    name: Box<str>,
    value: RefCell<Value>,
}

impl Binding {
    fn new(name: &str, value: Value) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            value: RefCell::new(value),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    pub(crate) fn set(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value.borrow())
    }
}

/// Runtime state of one call: its bindings in declaration order, plus the chain it was
/// entered from.
///
/// Records are shared between the call that created them and every closure built while the
/// call ran, so they live as long as the longest of those.
pub struct ActivationRecord {
    bindings: RefCell<Vec<Rc<Binding>>>,
    parent: Option<Chain>,
    live: Cell<bool>,
}

impl ActivationRecord {
    /// A record with no parent is the global record.
    pub fn create(parent: Option<Chain>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(Vec::new()),
            parent,
            live: Cell::new(true),
        })
    }

    /// Add a binding to this record. An existing binding with the same name is shadowed for
    /// later lookups, but the old `Binding` object is left as it was.
    pub fn declare(&self, name: &str, value: Value) -> Rc<Binding> {
        let binding = Binding::new(name, value);
        self.bindings.borrow_mut().push(Rc::clone(&binding));
        binding
    }

    /// Newest binding named `name` in this record only.
    pub fn lookup_local(&self, name: &str) -> Option<Rc<Binding>> {
        self.lookup_within(name, self.len())
    }

    pub(crate) fn lookup_within(&self, name: &str, limit: usize) -> Option<Rc<Binding>> {
        let bindings = self.bindings.borrow();
        bindings[..limit.min(bindings.len())]
            .iter()
            .rev()
            .find(|b| b.name() == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn parent(&self) -> Option<&Chain> {
        self.parent.as_ref()
    }

    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether the call owning this record is still running. The global record is always live.
    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    pub(crate) fn names(&self) -> Vec<Box<str>> {
        self.bindings
            .borrow()
            .iter()
            .map(|b| b.name.clone())
            .collect()
    }

    /// Drop every binding. Only used to break cycles when tearing down the global record.
    pub(crate) fn clear(&self) {
        let dropped = mem::take(&mut *self.bindings.borrow_mut());
        drop(dropped);
    }

    /// Called by the evaluator when the owning call returns, consuming its handle.
    ///
    /// A closure stored in one of this record's own bindings keeps the record alive through its
    /// chain, which is a cycle. If every remaining reference to the record comes from such
    /// closures, and nothing else holds those closures or their bindings, the bindings are
    /// dropped so the record can be freed.
    pub(crate) fn release(self: Rc<Self>) {
        if self.is_global() {
            return;
        }

        self.live.set(false);

        // (closure, occurrences in our bindings, strong count)
        let mut internal: Vec<(*const Closure, usize, usize)> = Vec::new();

        for binding in self.bindings.borrow().iter() {
            let value = binding.value.borrow();
            let closure = match &*value {
                Value::Closure(c) if Rc::ptr_eq(c.chain.record(), &self) => c,
                _ => continue,
            };

            if Rc::strong_count(binding) > 1 {
                return;
            }

            let ptr = Rc::as_ptr(closure);
            if let Some(entry) = internal.iter_mut().find(|(p, _, _)| *p == ptr) {
                entry.1 += 1;
            } else {
                internal.push((ptr, 1, Rc::strong_count(closure)));
            }
        }

        let only_cycles = Rc::strong_count(&self) == 1 + internal.len()
            && internal.iter().all(|(_, seen, strong)| seen == strong);

        if !internal.is_empty() && only_cycles {
            #[cfg(feature = "trace-execution")]
            log::debug!(
                "{:p} release :: breaking {} closure cycle(s)",
                Rc::as_ptr(&self),
                internal.len()
            );

            self.clear();
        }
    }
}

impl fmt::Debug for ActivationRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings.borrow().iter().map(|b| b.name.clone()))
            .finish()
    }
}

/// A handle on a record together with how much of it is visible through the handle.
///
/// The executing call sees its whole record. A closure sees only the bindings that existed when
/// it was built, so declarations made afterwards in the same record cannot capture its free
/// identifiers. This also means two sibling functions nested in the same body cannot call each
/// other: the first one built never sees the second.
///
/// The global record is sealed the same way, with one exception: a name with no binding inside
/// the horizon falls through to bindings declared later, so forward references between globals
/// and host globals defined after the fact still resolve.
#[derive(Clone)]
pub struct Chain {
    record: Rc<ActivationRecord>,
    horizon: Option<usize>,
}

impl Chain {
    pub fn open(record: Rc<ActivationRecord>) -> Self {
        Self {
            record,
            horizon: None,
        }
    }

    /// Freeze the current extent of this chain's record, for a closure being built now.
    pub fn capture(&self) -> Self {
        Self {
            record: Rc::clone(&self.record),
            horizon: Some(self.visible()),
        }
    }

    pub fn record(&self) -> &Rc<ActivationRecord> {
        &self.record
    }

    pub(crate) fn into_record(self) -> Rc<ActivationRecord> {
        self.record
    }

    /// Number of the record's bindings visible through this handle.
    pub fn visible(&self) -> usize {
        let len = self.record.len();
        self.horizon.map_or(len, |h| h.min(len))
    }

    pub fn lookup_here(&self, name: &str) -> Option<Rc<Binding>> {
        let found = self.record.lookup_within(name, self.visible());
        if found.is_none() && self.record.is_global() {
            return self.record.lookup_local(name);
        }
        found
    }

    /// Number of records between this one and the global record, inclusive of neither.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut link = self.record.parent();
        while let Some(chain) = link {
            depth += 1;
            link = chain.record.parent();
        }
        depth
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:p}", Rc::as_ptr(&self.record))?;
        if let Some(h) = self.horizon {
            write!(f, "[..{}]", h)?;
        }
        if let Some(parent) = self.record.parent() {
            write!(f, " -> {:?}", parent)?;
        }
        Ok(())
    }
}
