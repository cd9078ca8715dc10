use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Action payload, tagged at the call site: either the value itself or the
/// value wrapped under a `data` field. Untagged on the wire so both shapes
/// serialize the way the service emits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionPayload<R> {
    Wrapped { data: R },
    Bare(R),
}

impl<R> ActionPayload<R> {
    pub fn data(&self) -> &R {
        match self {
            ActionPayload::Wrapped { data } => data,
            ActionPayload::Bare(data) => data,
        }
    }

    pub fn into_data(self) -> R {
        match self {
            ActionPayload::Wrapped { data } => data,
            ActionPayload::Bare(data) => data,
        }
    }
}

/// Uniform envelope returned by every server action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult<R, E> {
    pub is_success: bool,
    pub response: Option<ActionPayload<R>>,
    pub errors: Option<E>,
    pub code: Option<u16>,
}

impl<R, E> ActionResult<R, E> {
    pub fn success(code: u16, payload: ActionPayload<R>) -> Self {
        Self {
            is_success: true,
            response: Some(payload),
            errors: None,
            code: Some(code),
        }
    }

    pub fn failure(code: Option<u16>, errors: E) -> Self {
        Self {
            is_success: false,
            response: None,
            errors: Some(errors),
            code,
        }
    }
}

type SuccessFn<R> = Box<dyn Fn(&R, &ActionPayload<R>) + Send + Sync>;
type ErrorFn<E> = Box<dyn Fn(&E, Option<u16>) + Send + Sync>;
type MergeFn<R> = Box<dyn Fn(R, R) -> R + Send + Sync>;

struct HookState<R, E> {
    data: Option<R>,
    errors: Option<E>,
    code: Option<u16>,
}

/// Bridge between an async action and UI-observable state. Running an
/// action raises `is_pending` for its duration; on success the payload is
/// stored (merged with prior data when a merge function is set), on failure
/// the error and status code are stored and the data is left untouched.
/// The success callback receives the extracted payload as returned by the
/// action; merging only affects the stored data.
///
/// There is no retry, timeout or cancellation. Overlapping runs are
/// allowed; results land in completion order, and `is_pending` stays true
/// while any run is in flight.
pub struct ActionHook<R, E> {
    state: Mutex<HookState<R, E>>,
    in_flight: AtomicUsize,
    on_success: Option<SuccessFn<R>>,
    on_error: Option<ErrorFn<E>>,
    merge: Option<MergeFn<R>>,
}

impl<R, E> ActionHook<R, E> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HookState {
                data: None,
                errors: None,
                code: None,
            }),
            in_flight: AtomicUsize::new(0),
            on_success: None,
            on_error: None,
            merge: None,
        }
    }

    pub fn on_success(mut self, f: impl Fn(&R, &ActionPayload<R>) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&E, Option<u16>) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn merge_with(mut self, f: impl Fn(R, R) -> R + Send + Sync + 'static) -> Self {
        self.merge = Some(Box::new(f));
        self
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn code(&self) -> Option<u16> {
        self.state.lock().unwrap().code
    }
}

impl<R, E> Default for ActionHook<R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone, E: Clone> ActionHook<R, E> {
    pub fn data(&self) -> Option<R> {
        self.state.lock().unwrap().data.clone()
    }

    pub fn errors(&self) -> Option<E> {
        self.state.lock().unwrap().errors.clone()
    }

    /// Drive one action through the hook and hand its envelope back to the
    /// caller. Awaiting never blocks the invoking thread.
    pub async fn run<F>(&self, action: F) -> ActionResult<R, E>
    where
        F: Future<Output = ActionResult<R, E>>,
    {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = action.await;
        self.apply(&result);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    // State is updated and the lock released before any callback runs, so a
    // callback may read the hook without deadlocking.
    fn apply(&self, result: &ActionResult<R, E>) {
        let mut state = self.state.lock().unwrap();
        state.code = result.code;
        if !result.is_success {
            state.errors = result.errors.clone();
            drop(state);
            if let (Some(cb), Some(errors)) = (&self.on_error, &result.errors) {
                cb(errors, result.code);
            }
        } else if let Some(payload) = &result.response {
            let new_data = payload.data().clone();
            let merged = match (state.data.take(), &self.merge) {
                (Some(old), Some(merge)) => merge(old, new_data.clone()),
                (_, _) => new_data.clone(),
            };
            state.data = Some(merged);
            drop(state);
            if let Some(cb) = &self.on_success {
                cb(&new_data, payload);
            }
        }
    }
}
