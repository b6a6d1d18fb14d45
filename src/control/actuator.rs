//! Actuator controller.
//!
//! Applies a [`PumpDecision`] to the pump relay and the indicator LED, which
//! always mirror each other.  Applying the decision that is already in effect
//! writes nothing, so the control loop may call [`ActuatorController::apply`]
//! every tick without chattering the relay driver.
//!
//! ## Safety contract
//!
//! Outputs start released.  [`ActuatorController::force_off`] drives both
//! LOW unconditionally and is used at boot before the first decision.

use log::info;

use crate::app::ports::ActuatorPort;

use super::decision::PumpDecision;

#[derive(Debug, Default)]
pub struct ActuatorController {
    /// Decision last written to the outputs; `None` before the first write.
    applied: Option<PumpDecision>,
}

impl ActuatorController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive both outputs to the decision.  Returns `true` if anything was
    /// written.
    pub fn apply(&mut self, decision: PumpDecision, hw: &mut impl ActuatorPort) -> bool {
        if self.applied == Some(decision) {
            return false;
        }

        hw.set_pump_relay(decision.should_run);
        hw.set_indicator(decision.should_run);
        self.applied = Some(decision);

        info!("Pump {}", if decision.should_run { "ON" } else { "OFF" });
        true
    }

    /// Release both outputs regardless of what was applied before.
    pub fn force_off(&mut self, hw: &mut impl ActuatorPort) {
        hw.set_pump_relay(false);
        hw.set_indicator(false);
        self.applied = Some(PumpDecision::STOP);
    }

    /// Decision currently in effect on the outputs.
    pub fn applied(&self) -> Option<PumpDecision> {
        self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Outputs {
        relay: bool,
        indicator: bool,
        writes: u32,
    }

    impl ActuatorPort for Outputs {
        fn set_pump_relay(&mut self, on: bool) {
            self.relay = on;
            self.writes += 1;
        }

        fn set_indicator(&mut self, on: bool) {
            self.indicator = on;
            self.writes += 1;
        }
    }

    #[test]
    fn first_apply_drives_both_outputs() {
        let mut hw = Outputs::default();
        let mut ctl = ActuatorController::new();
        assert!(ctl.apply(PumpDecision::RUN, &mut hw));
        assert!(hw.relay && hw.indicator);
        assert_eq!(hw.writes, 2);
    }

    #[test]
    fn repeated_decision_is_idempotent() {
        let mut hw = Outputs::default();
        let mut ctl = ActuatorController::new();
        ctl.apply(PumpDecision::RUN, &mut hw);
        assert!(!ctl.apply(PumpDecision::RUN, &mut hw));
        assert!(hw.relay && hw.indicator);
        assert_eq!(hw.writes, 2, "second apply must not touch the outputs");
    }

    #[test]
    fn change_of_decision_rewrites_outputs() {
        let mut hw = Outputs::default();
        let mut ctl = ActuatorController::new();
        ctl.apply(PumpDecision::RUN, &mut hw);
        assert!(ctl.apply(PumpDecision::STOP, &mut hw));
        assert!(!hw.relay && !hw.indicator);
        assert_eq!(ctl.applied(), Some(PumpDecision::STOP));
    }

    #[test]
    fn force_off_then_stop_is_a_no_op() {
        let mut hw = Outputs::default();
        let mut ctl = ActuatorController::new();
        ctl.force_off(&mut hw);
        assert_eq!(hw.writes, 2);
        assert!(!ctl.apply(PumpDecision::STOP, &mut hw));
        assert_eq!(hw.writes, 2);
    }
}
