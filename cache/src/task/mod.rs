//! Background tasks owned by the cache. Currently only the notifier that
//! forwards load events to a registered listener.

pub(crate) mod notifier;
