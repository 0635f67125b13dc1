use std::rc::Rc;

use {super::record::ActivationRecord, crate::Closure};

#[derive(Debug)]
pub(crate) struct CallFrame {
    pub(crate) name: Box<str>,
    pub(crate) record: Rc<ActivationRecord>,
}

impl CallFrame {
    pub(crate) fn new(callee: &Closure, record: Rc<ActivationRecord>) -> Self {
        Self {
            name: callee.name().into(),
            record,
        }
    }
}
