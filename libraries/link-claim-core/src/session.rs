//! Claim screen state as a single value updated by events.

use alloy_primitives::Address;

use crate::{
    catalog::ChainTokenCatalog,
    error::ClaimError,
    types::{ChainId, RouteKey, Selection},
};

/// User and service events that change the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ChainSelected(ChainId),
    TokenSelected(Address),
    ResetToOrigin,
    ManualEntryToggled(bool),
    ManualAddressChanged(String),
    RouteRequested(RouteKey),
    RouteResolved(RouteKey),
    RouteFailed(RouteKey, ClaimError),
    ClaimFailed(ClaimError),
    ErrorDismissed,
}

/// Everything the claim screen renders, apart from claim progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub catalog: ChainTokenCatalog,
    /// Whether the claimer is typing a recipient instead of using the wallet
    pub manual_entry: bool,
    pub manual_address: String,
    /// A quote for the current selection is being fetched
    pub route_loading: bool,
    /// Last error surfaced to the user
    pub error: Option<ClaimError>,
}

impl SessionState {
    pub fn new(catalog: ChainTokenCatalog) -> Self {
        Self {
            catalog,
            manual_entry: false,
            manual_address: String::new(),
            route_loading: false,
            error: None,
        }
    }

    pub fn selection(&self) -> Selection {
        self.catalog.selection()
    }

    /// Apply one event. Returns whether anything changed.
    ///
    /// Route outcomes for a key other than the current selection are
    /// ignored, so a late quote never lands on a newer selection.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::ChainSelected(chain_id) => {
                self.catalog.select_chain(chain_id);
                self.error = None;
                self.route_loading = false;
                true
            }
            SessionEvent::TokenSelected(address) => {
                let changed = self.catalog.select_token(address);
                if changed {
                    self.error = None;
                    self.route_loading = false;
                }
                changed
            }
            SessionEvent::ResetToOrigin => {
                self.catalog.reset_to_origin();
                self.route_loading = false;
                self.error = None;
                true
            }
            SessionEvent::ManualEntryToggled(enabled) => {
                let changed = self.manual_entry != enabled;
                self.manual_entry = enabled;
                changed
            }
            SessionEvent::ManualAddressChanged(address) => {
                let changed = self.manual_address != address;
                self.manual_address = address;
                changed
            }
            SessionEvent::RouteRequested(key) => {
                if !self.is_current(key) {
                    return false;
                }
                self.route_loading = true;
                self.error = None;
                true
            }
            SessionEvent::RouteResolved(key) => {
                if !self.is_current(key) {
                    return false;
                }
                self.route_loading = false;
                true
            }
            SessionEvent::RouteFailed(key, error) => {
                if !self.is_current(key) {
                    return false;
                }
                self.route_loading = false;
                self.error = Some(error);
                true
            }
            SessionEvent::ClaimFailed(error) => {
                self.error = Some(error);
                true
            }
            SessionEvent::ErrorDismissed => self.error.take().is_some(),
        }
    }

    fn is_current(&self, key: RouteKey) -> bool {
        self.selection().route_key() == Some(key)
    }
}
