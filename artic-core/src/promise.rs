use crate::error::Error;

/// Outcome of an asynchronous request, tagged with what was requested.
///
/// Results are only accepted while the promise is still deferred on the same
/// request, so a late answer to an older request is dropped.
#[derive(Clone, Debug)]
pub enum Promise<T, D = (), E = Error> {
    Empty,
    Deferred(D),
    Resolved(T),
    Rejected(E),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PromiseState {
    Empty,
    Deferred,
    Resolved,
    Rejected,
}

impl<T, D, E> Promise<T, D, E> {
    pub fn state(&self) -> PromiseState {
        match self {
            Self::Empty => PromiseState::Empty,
            Self::Deferred(_) => PromiseState::Deferred,
            Self::Resolved(_) => PromiseState::Resolved,
            Self::Rejected(_) => PromiseState::Rejected,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn is_deferred(&self, def: &D) -> bool
    where
        D: PartialEq,
    {
        matches!(self, Self::Deferred(d) if d == def)
    }

    pub fn rejection(&self) -> Option<&E> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }

    pub fn defer(&mut self, def: D) {
        *self = Self::Deferred(def);
    }

    pub fn resolve_or_reject(&mut self, res: Result<T, E>) {
        *self = match res {
            Ok(ok) => Self::Resolved(ok),
            Err(err) => Self::Rejected(err),
        };
    }

    /// Settle with `res` if still waiting on `def`.  Returns whether the
    /// result was taken.
    pub fn update(&mut self, (def, res): (D, Result<T, E>)) -> bool
    where
        D: PartialEq,
    {
        if self.is_deferred(&def) {
            self.resolve_or_reject(res);
            true
        } else {
            false
        }
    }
}

impl<T, D, E> Default for Promise<T, D, E> {
    fn default() -> Self {
        Self::Empty
    }
}
