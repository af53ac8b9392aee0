use std::time::Duration;

use tracing::debug;

/// Operations that carry simulated network latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SignUp,
    SignIn,
    SignOut,
    Generate,
    Deploy,
    Undeploy,
    Checkout,
    ConnectAccount,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SignUp => "sign_up",
            Operation::SignIn => "sign_in",
            Operation::SignOut => "sign_out",
            Operation::Generate => "generate",
            Operation::Deploy => "deploy",
            Operation::Undeploy => "undeploy",
            Operation::Checkout => "checkout",
            Operation::ConnectAccount => "connect_account",
        }
    }
}

/// Per-operation artificial delay applied before a mock service acts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyPolicy {
    pub sign_up: Duration,
    pub sign_in: Duration,
    pub sign_out: Duration,
    pub generate: Duration,
    pub deploy: Duration,
    pub undeploy: Duration,
    pub checkout: Duration,
    pub connect_account: Duration,
}

impl Default for LatencyPolicy {
    fn default() -> Self {
        Self {
            sign_up: Duration::from_millis(500),
            sign_in: Duration::from_millis(500),
            sign_out: Duration::from_millis(500),
            generate: Duration::from_millis(2000),
            deploy: Duration::from_millis(3000),
            undeploy: Duration::from_millis(1000),
            checkout: Duration::from_millis(500),
            connect_account: Duration::from_millis(1000),
        }
    }
}

impl LatencyPolicy {
    /// No delays at all.
    pub fn none() -> Self {
        Self {
            sign_up: Duration::ZERO,
            sign_in: Duration::ZERO,
            sign_out: Duration::ZERO,
            generate: Duration::ZERO,
            deploy: Duration::ZERO,
            undeploy: Duration::ZERO,
            checkout: Duration::ZERO,
            connect_account: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, op: Operation) -> Duration {
        match op {
            Operation::SignUp => self.sign_up,
            Operation::SignIn => self.sign_in,
            Operation::SignOut => self.sign_out,
            Operation::Generate => self.generate,
            Operation::Deploy => self.deploy,
            Operation::Undeploy => self.undeploy,
            Operation::Checkout => self.checkout,
            Operation::ConnectAccount => self.connect_account,
        }
    }

    /// Sleeps for the operation's delay. Always runs to completion; there is
    /// no cancellation.
    pub async fn simulate(&self, op: Operation) {
        let delay = self.delay_for(op);
        if delay.is_zero() {
            return;
        }
        debug!("Simulating {}ms latency for {}", delay.as_millis(), op.as_str());
        tokio::time::sleep(delay).await;
    }
}
