//! Callback Registry
//!
//! Maps callback ids to handlers. The ICA transport records the id and the
//! encoded args on every outbound packet and hands both back here when the
//! acknowledgement arrives. The registry is built once at module wiring time
//! and is read-only afterwards.

use std::collections::HashMap;

use tracing::info_span;

use super::delegate::DelegateCallbackHandler;
use super::error::{CallbackError, CallbackResult};
use super::redemption::RedemptionCallbackHandler;
use super::CallbackHandler;
use crate::codec::CallbackArgs;
use crate::common::logging::log_callback_event;
use crate::keeper::Keeper;
use crate::types::{AcknowledgementResult, CallbackKind, Packet};

#[derive(Default)]
pub struct CallbackRegistry {
    handlers: HashMap<String, Box<dyn CallbackHandler>>,
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `delegate` and `redemption` handlers wired
    pub fn with_default_callbacks() -> Self {
        let mut registry = Self::new();
        registry
            .register(CallbackKind::Delegate.as_str(), DelegateCallbackHandler)
            .register(CallbackKind::Redemption.as_str(), RedemptionCallbackHandler);
        registry
    }

    /// Register `handler` under `id`, replacing any earlier registration
    pub fn register<H>(&mut self, id: impl Into<String>, handler: H) -> &mut Self
    where
        H: CallbackHandler + 'static,
    {
        let id = id.into();
        if self.handlers.insert(id.clone(), Box::new(handler)).is_some() {
            tracing::warn!(target: "stakeibc::callbacks", id = %id, "callback handler replaced");
        }
        self
    }

    pub fn has(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Run the handler registered under `id` and return its result unchanged
    pub fn dispatch(
        &self,
        id: &str,
        keeper: &mut Keeper<'_>,
        packet: &Packet,
        ack: Option<&AcknowledgementResult>,
        args: &[u8],
    ) -> CallbackResult {
        let span = info_span!(
            "ica_callback",
            id,
            packet = %packet.correlation_id(),
            data = %packet.data_hash()
        );
        let _guard = span.enter();

        let handler = self
            .handlers
            .get(id)
            .ok_or_else(|| CallbackError::UnknownCallback(id.to_string()))
            .inspect_err(|e| log_callback_event(id, packet, Some(e)))?;

        let result = handler.process(keeper, packet, ack, args);
        log_callback_event(id, packet, result.as_ref().err());
        result
    }

    /// Encode typed args and dispatch them under their kind's id
    pub fn dispatch_args(
        &self,
        keeper: &mut Keeper<'_>,
        packet: &Packet,
        ack: Option<&AcknowledgementResult>,
        args: &CallbackArgs,
    ) -> CallbackResult {
        let bytes = args.encode()?;
        self.dispatch(args.kind().as_str(), keeper, packet, ack, &bytes)
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LedgerStore, MemoryLedgerStore};
    use crate::types::{HostZone, RedemptionCallback, UserRedemptionRecord};

    /// Records which handler ran by writing a marker zone
    struct MarkerHandler(&'static str);

    impl CallbackHandler for MarkerHandler {
        fn process(
            &self,
            keeper: &mut Keeper<'_>,
            _packet: &Packet,
            _ack: Option<&AcknowledgementResult>,
            _args: &[u8],
        ) -> CallbackResult {
            keeper.set_host_zone(&HostZone::new(self.0, Vec::<String>::new()))?;
            Ok(())
        }
    }

    #[test]
    fn test_default_callbacks() {
        let registry = CallbackRegistry::with_default_callbacks();

        assert!(registry.has("delegate"));
        assert!(registry.has("redemption"));
        assert!(!registry.has("Delegate"));
        assert_eq!(registry.ids(), vec!["delegate", "redemption"]);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = CallbackRegistry::new();
        assert!(!registry.has("custom"));

        registry.register("custom", MarkerHandler("first"));
        registry.register("custom", MarkerHandler("second"));
        assert!(registry.has("custom"));
        assert_eq!(registry.ids().len(), 1);

        let mut store = MemoryLedgerStore::new();
        let mut keeper = Keeper::new(&mut store);
        registry
            .dispatch("custom", &mut keeper, &Packet::default(), None, &[])
            .unwrap();

        assert!(store.get_host_zone("second").unwrap().is_some());
        assert!(store.get_host_zone("first").unwrap().is_none());
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let registry = CallbackRegistry::with_default_callbacks();
        let mut store = MemoryLedgerStore::new();
        let mut keeper = Keeper::new(&mut store);

        let err = registry
            .dispatch("undelegate", &mut keeper, &Packet::default(), None, &[])
            .unwrap_err();

        assert!(matches!(err, CallbackError::UnknownCallback(ref id) if id == "undelegate"));
    }

    #[test]
    fn test_dispatch_args_routes_by_kind() {
        let registry = CallbackRegistry::with_default_callbacks();
        let mut store = MemoryLedgerStore::new();
        store
            .set_user_redemption_record(&UserRedemptionRecord::new(1, "a", "b", 5, "GAIA"))
            .unwrap();

        let mut keeper = Keeper::new(&mut store);
        let args = CallbackArgs::from(RedemptionCallback { user_redemption_record_id: 1 });
        registry
            .dispatch_args(&mut keeper, &Packet::default(), Some(&AcknowledgementResult::default()), &args)
            .unwrap();

        assert!(store.get_user_redemption_record(1).unwrap().is_none());
    }
}
