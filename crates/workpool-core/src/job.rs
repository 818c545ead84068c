//! The unit of work a pool dispatches.

/// A boxed, type-erased unit of work.
///
/// The spec's `{ function, arg }` record is expressed here as a single
/// `FnOnce` closure: the argument is whatever the closure captures, which
/// makes the "who owns `arg`" question from the design notes moot — the
/// closure owns whatever it captured, and dropping the closure (whether it
/// ran or was discarded unrun) drops that state. A submitter that needs a
/// result back encodes a reply channel in the capture, exactly as the spec
/// requires.
pub type Job = Box<dyn FnOnce() + Send + 'static>;
