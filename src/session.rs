use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::form::ProblemForm;

/// Name of the cookie carrying the browser session id
pub const SESSION_COOKIE: &str = "milp_session";

/// Problem forms of recent browser sessions; the least recently used
/// form is evicted once the registry is full.
pub struct SessionRegistry {
    forms: Mutex<LruCache<String, ProblemForm>>,
}

impl SessionRegistry {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            forms: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fresh random session id
    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Accept only ids this registry could have issued
    pub fn is_valid_id(id: &str) -> bool {
        Uuid::parse_str(id).is_ok()
    }

    /// Run `f` against the session's form, creating an empty one if needed.
    ///
    /// The lock is held for the duration of `f`; never await inside it.
    pub fn with_form<R>(&self, id: &str, f: impl FnOnce(&mut ProblemForm) -> R) -> R {
        let mut forms = self.forms.lock();
        if !forms.contains(id) {
            forms.put(id.to_string(), ProblemForm::new());
        }
        match forms.get_mut(id) {
            Some(form) => f(form),
            None => f(&mut ProblemForm::new()),
        }
    }

    /// Copy of the session's form
    pub fn snapshot(&self, id: &str) -> ProblemForm {
        self.with_form(id, |form| form.clone())
    }

    pub fn len(&self) -> usize {
        self.forms.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
