//! Fluent builder for constructing a [`Dispatch`].

use ra_core::Role;
use ra_route::{DirectRouteProvider, RouteProvider};
use ra_sync::Channel;

use crate::{Dispatch, DispatchConfig, DispatchResult, Requester, Responder};

/// Fluent builder for [`Dispatch<P>`].
///
/// | Method          | Default                  |
/// |-----------------|--------------------------|
/// | `.provider(p)`  | [`DirectRouteProvider`]  |
///
/// Each process gets its own clone of the provider, so a provider that keeps
/// state (a cache, a failure counter) should share it behind an `Rc` or
/// `Arc`.
///
/// ```rust,ignore
/// let mut dispatch = DispatchBuilder::new(DispatchConfig::default())
///     .provider(StaticRouteProvider::new(50.0).with_leg(leg, None))
///     .build()?;
/// dispatch.requester.request_help(dispatch.now())?;
/// dispatch.run_ticks(100, &mut NoopObserver)?;
/// ```
pub struct DispatchBuilder<P = DirectRouteProvider> {
    config:   DispatchConfig,
    provider: P,
}

impl DispatchBuilder<DirectRouteProvider> {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config, provider: DirectRouteProvider::default() }
    }
}

impl<P: RouteProvider + Clone> DispatchBuilder<P> {
    /// Replace the routing lookup.
    pub fn provider<Q: RouteProvider + Clone>(self, provider: Q) -> DispatchBuilder<Q> {
        DispatchBuilder { config: self.config, provider }
    }

    /// Validate the configuration, open the channel, attach both endpoints,
    /// and return a ready-to-run [`Dispatch`].
    pub fn build(self) -> DispatchResult<Dispatch<P>> {
        self.config.validate()?;

        let channel = Channel::new(&self.config.channel_name, self.config.faults);
        let requester = Requester::new(
            self.config.clone(),
            channel.attach(Role::Requester),
            self.provider.clone(),
        )?;
        let responder = Responder::new(
            self.config.clone(),
            channel.attach(Role::Responder),
            self.provider,
        )?;
        tracing::debug!(channel = channel.name(), faults = ?self.config.faults, "dispatch built");

        Ok(Dispatch {
            clock: self.config.clock(),
            config: self.config,
            requester,
            responder,
            channel,
        })
    }
}
