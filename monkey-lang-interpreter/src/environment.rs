use crate::object::Object;
use gc::{Finalize, Gc, GcCell, Trace};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Trace, Finalize)]
pub struct EnvironmentCore {
    store: HashMap<Rc<str>, Object>,
    outer: Option<Environment>,
}

/// A scope in the environment chain. Cloning shares the scope: closures keep
/// their defining scope alive for as long as they exist, and the collector
/// reclaims cycles between scopes and the functions stored in them.
#[derive(Debug, Clone, Trace, Finalize)]
pub struct Environment {
    environment: Gc<GcCell<EnvironmentCore>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            environment: Gc::new(GcCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    pub fn new_enclosed(outer: Environment) -> Environment {
        Environment {
            environment: Gc::new(GcCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: Some(outer),
            })),
        }
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        let env = self.environment.borrow();
        env.store
            .get(key)
            .cloned()
            .or_else(|| env.outer.as_ref().and_then(|outer| outer.get(key)))
    }

    pub fn set(&mut self, key: Rc<str>, value: Object) {
        self.environment.borrow_mut().store.insert(key, value);
    }

    /// Number of bindings held directly by this scope.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.environment.borrow().store.len()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Gc::ptr_eq(&self.environment, &other.environment)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
