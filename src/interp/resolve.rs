use std::rc::Rc;

use super::{
    record::{ActivationRecord, Binding, Chain},
    RuntimeError,
};

/// Where a name was found.
pub struct Lookup {
    pub binding: Rc<Binding>,
    pub record: Rc<ActivationRecord>,
    /// Records walked past before the binding was found.
    pub hops: usize,
}

/// Find the binding `name` refers to from `chain`.
///
/// The chain's own record is searched first, newest binding first and only as far as the
/// chain can see, then each parent in turn. The nearest record wins.
///
/// ### Example
///
/// ```
/// use {std::rc::Rc, lexenv::{resolve, ActivationRecord, Chain, Value}};
///
/// let global = ActivationRecord::create(None);
/// global.declare("z", Value::Int(10));
///
/// let frame = ActivationRecord::create(Some(Chain::open(Rc::clone(&global))));
/// frame.declare("x", Value::Int(3));
/// let chain = Chain::open(frame);
///
/// assert_eq!(resolve("z", &chain).unwrap().get(), Value::Int(10));
/// assert_eq!(resolve("x", &chain).unwrap().get(), Value::Int(3));
/// assert!(resolve("nope", &chain).is_err());
/// ```
pub fn resolve(name: &str, chain: &Chain) -> Result<Rc<Binding>, RuntimeError> {
    lookup(name, chain).map(|found| found.binding)
}

pub fn lookup(name: &str, chain: &Chain) -> Result<Lookup, RuntimeError> {
    let mut link = Some(chain);
    let mut hops = 0;

    while let Some(current) = link {
        if let Some(binding) = current.lookup_here(name) {
            #[cfg(feature = "trace-resolution")]
            log::debug!("resolve `{}` :: {} hop(s) from {:?}", name, hops, chain);

            return Ok(Lookup {
                binding,
                record: Rc::clone(current.record()),
                hops,
            });
        }

        link = current.record().parent();
        hops += 1;
    }

    #[cfg(feature = "trace-resolution")]
    log::debug!("resolve `{}` :: unbound from {:?}", name, chain);

    Err(RuntimeError::UnboundIdentifier(name.to_string()))
}
