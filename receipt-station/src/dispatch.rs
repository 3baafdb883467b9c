//! Print dispatch
//!
//! One print action walks a one-shot state machine:
//!
//! ```text
//! Idle -> ChannelOpening -> Writing -> Closing -> Done
//! Idle -> ChannelOpening (fail) -> FallbackNetwork -> Done | Failed
//! Idle -> ServiceRequest -> Done | Failed
//! ```
//!
//! Transports are whatever the environment hands in; nothing is probed here.
//! There are no retries and no queue. Each call stands alone.

use std::sync::Arc;
use std::time::Duration;

use receipt_printer::{
    CodePage, DirectChannel, NetworkPrintService, PrintError, PrintResult, ToneSink,
    TransportError, play_confirmation_tone, receipt_job,
};
use shared::{LayoutProfile, TransportTarget};
use tracing::{debug, info, instrument, warn};

use crate::logger::MANUAL_PRINT_TARGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintState {
    Idle,
    ChannelOpening,
    Writing,
    Closing,
    /// Direct channel missing or failed, trying the network service
    FallbackNetwork,
    /// Network service is the configured transport
    ServiceRequest,
    Done,
    Failed,
}

/// Transport that delivered the receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    DirectChannel,
    NetworkService,
}

#[derive(Debug)]
pub struct PrintOutcome {
    /// States visited, in order
    pub states: Vec<PrintState>,
    pub result: PrintResult<Delivery>,
}

impl PrintOutcome {
    pub fn is_done(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> PrintResult<Delivery> {
        self.result
    }
}

pub struct PrintDispatcher {
    direct: Option<Arc<dyn DirectChannel>>,
    service: Option<NetworkPrintService>,
    tone: Option<Box<dyn ToneSink>>,
    code_page: CodePage,
    timeout: Duration,
}

impl Default for PrintDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintDispatcher {
    /// Dispatcher with no transports; add the ones this machine has
    pub fn new() -> Self {
        Self {
            direct: None,
            service: None,
            tone: None,
            code_page: CodePage::default(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_direct_channel(mut self, channel: Arc<dyn DirectChannel>) -> Self {
        self.direct = Some(channel);
        self
    }

    /// Service used when the direct channel is missing or fails
    pub fn with_network_service(mut self, service: NetworkPrintService) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_tone(mut self, sink: Box<dyn ToneSink>) -> Self {
        self.tone = Some(sink);
        self
    }

    pub fn with_code_page(mut self, page: CodePage) -> Self {
        self.code_page = page;
        self
    }

    /// Timeout for services built from a profile's network target
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Deliver one formatted receipt
    #[instrument(skip(self, text, profile), fields(copies = profile.copies(), text_len = text.len()))]
    pub async fn print(&self, text: &str, profile: &LayoutProfile) -> PrintOutcome {
        let mut states = vec![PrintState::Idle];
        let copies = profile.copies();

        let service = match &profile.transport {
            TransportTarget::DirectChannel => {
                match &self.direct {
                    Some(channel) => {
                        let sent = self.send_direct(channel.as_ref(), text, copies, &mut states).await;
                        match sent {
                            Ok(()) => {
                                return self.finish(states, Ok(Delivery::DirectChannel), profile);
                            }
                            Err(e) => warn!(
                                channel = %channel.describe(),
                                error = %e,
                                "Direct channel failed, falling back to network service"
                            ),
                        }
                    }
                    None => debug!("No direct channel available"),
                }
                states.push(PrintState::FallbackNetwork);
                self.service.clone()
            }
            TransportTarget::NetworkService { host, port } => {
                states.push(PrintState::ServiceRequest);
                match NetworkPrintService::with_timeout(host, *port, self.timeout) {
                    Ok(service) => Some(service),
                    Err(e) => {
                        // a target that cannot be addressed is a failed service call
                        let e = PrintError::ServiceUnavailable(e.to_string());
                        log_for_manual_print(text, &e);
                        return self.finish(states, Err(e), profile);
                    }
                }
            }
        };

        let Some(service) = service else {
            let e = PrintError::NoTransport;
            log_for_manual_print(text, &e);
            return self.finish(states, Err(e), profile);
        };

        let result = service
            .send(text, copies, profile.paper_width().millimeters())
            .await
            .map(|()| Delivery::NetworkService);
        self.finish(states, result, profile)
    }

    /// Open, write every copy as one job, close
    async fn send_direct(
        &self,
        channel: &dyn DirectChannel,
        text: &str,
        copies: u32,
        states: &mut Vec<PrintState>,
    ) -> PrintResult<()> {
        let job = receipt_job(text, self.code_page).repeat(copies as usize);

        states.push(PrintState::ChannelOpening);
        match channel.send(&job).await {
            Ok(()) => {
                states.extend([PrintState::Writing, PrintState::Closing]);
                Ok(())
            }
            Err(e) => {
                // Opened but the write failed; the channel still closed
                if matches!(e, PrintError::Transport(TransportError::Write(_))) {
                    states.extend([PrintState::Writing, PrintState::Closing]);
                }
                Err(e)
            }
        }
    }

    fn finish(
        &self,
        mut states: Vec<PrintState>,
        result: PrintResult<Delivery>,
        profile: &LayoutProfile,
    ) -> PrintOutcome {
        match &result {
            Ok(delivery) => {
                states.push(PrintState::Done);
                info!(?delivery, "Receipt printed");
                if profile.enable_sound
                    && let Some(tone) = &self.tone
                {
                    play_confirmation_tone(tone.as_ref());
                }
            }
            Err(e) => {
                states.push(PrintState::Failed);
                warn!(error = %e, "Receipt not printed");
            }
        }
        PrintOutcome { states, result }
    }
}

fn log_for_manual_print(text: &str, error: &PrintError) {
    warn!(
        target: MANUAL_PRINT_TARGET,
        error = %error,
        "No print transport, receipt text follows for manual printing\n{}",
        text
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_transport() {
        let dispatcher = PrintDispatcher::new();
        let profile = LayoutProfile::default().with_transport(TransportTarget::DirectChannel);

        let outcome = dispatcher.print("x\n", &profile).await;

        assert_eq!(
            outcome.states,
            vec![PrintState::Idle, PrintState::FallbackNetwork, PrintState::Failed]
        );
        assert!(matches!(outcome.result, Err(PrintError::NoTransport)));
    }

    #[tokio::test]
    async fn test_unaddressable_network_target() {
        let dispatcher = PrintDispatcher::new();
        for host in ["", "bad host"] {
            let profile = LayoutProfile::default().with_transport(TransportTarget::NetworkService {
                host: host.to_string(),
                port: 9100,
            });

            let outcome = dispatcher.print("x\n", &profile).await;

            assert_eq!(
                outcome.states,
                vec![PrintState::Idle, PrintState::ServiceRequest, PrintState::Failed]
            );
            assert!(
                matches!(outcome.into_result(), Err(PrintError::ServiceUnavailable(_))),
                "{:?}",
                host
            );
        }
    }
}
