//! Plant model — deterministic physical surrogate for the air network.
//!
//! Used in simulation mode when no live sensor is attached: pressure rises
//! while the compressor runs and drains while it is off, floored at zero
//! (a tank cannot hold negative pressure).

use crate::controller::ActuatorState;
use crate::error::DomainError;

/// Deterministic compressed-air plant.
///
/// `advance` is pure given the internal pressure state; noise is injected by
/// the caller at sampling time so tests can run with it disabled.
#[derive(Debug, Clone)]
pub struct PlantModel {
    pressure_bar: f64,
    gain_bar_per_s: f64,
    drain_bar_per_s: f64,
}

impl PlantModel {
    /// Create a plant at the given initial pressure.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPlantParameter`] if the initial pressure
    /// is negative or any parameter is not finite or negative.
    pub fn new(
        initial_pressure_bar: f64,
        gain_bar_per_s: f64,
        drain_bar_per_s: f64,
    ) -> Result<Self, DomainError> {
        let check = |name: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(DomainError::InvalidPlantParameter { name, value })
            }
        };
        check("initial_pressure_bar", initial_pressure_bar)?;
        check("gain_bar_per_s", gain_bar_per_s)?;
        check("drain_bar_per_s", drain_bar_per_s)?;
        Ok(Self {
            pressure_bar: initial_pressure_bar,
            gain_bar_per_s,
            drain_bar_per_s,
        })
    }

    /// Current true pressure, without sampling noise.
    #[must_use]
    pub fn pressure_bar(&self) -> f64 {
        self.pressure_bar
    }

    /// Advance the physics by `dt_s` seconds under the given actuator state
    /// and return the new pressure.
    ///
    /// Compressor on: `pressure += gain·dt`. Compressor off:
    /// `pressure = max(0, pressure − drain·dt)`.
    pub fn advance(&mut self, actuator: ActuatorState, dt_s: f64) -> f64 {
        self.pressure_bar = match actuator {
            ActuatorState::On => self.pressure_bar + self.gain_bar_per_s * dt_s,
            ActuatorState::Off => (self.pressure_bar - self.drain_bar_per_s * dt_s).max(0.0),
        };
        self.pressure_bar
    }

    /// Sample the plant with a caller-supplied noise term (bar).
    ///
    /// The caller bounds the noise; `0.0` gives a deterministic sample.
    /// Clamped at zero so noise can never produce a physically impossible
    /// negative reading.
    #[must_use]
    pub fn sample(&self, noise_bar: f64) -> f64 {
        (self.pressure_bar + noise_bar).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_rise_while_compressor_runs() {
        let mut plant = PlantModel::new(6.5, 0.4, 0.1).unwrap();
        let p = plant.advance(ActuatorState::On, 1.0);
        assert!((p - 6.9).abs() < 1e-9);
    }

    #[test]
    fn should_drain_while_compressor_stopped() {
        let mut plant = PlantModel::new(6.5, 0.4, 0.1).unwrap();
        let p = plant.advance(ActuatorState::Off, 1.0);
        assert!((p - 6.4).abs() < 1e-9);
    }

    #[test]
    fn should_never_go_negative() {
        // Aggressive drain and huge steps must clamp at zero.
        let mut plant = PlantModel::new(0.3, 0.4, 5.0).unwrap();
        for _ in 0..10 {
            let p = plant.advance(ActuatorState::Off, 60.0);
            assert!(p >= 0.0);
        }
        assert!(plant.pressure_bar().abs() < f64::EPSILON);
    }

    #[test]
    fn should_be_deterministic_without_noise() {
        let mut a = PlantModel::new(6.5, 0.4, 0.1).unwrap();
        let mut b = PlantModel::new(6.5, 0.4, 0.1).unwrap();
        for _ in 0..30 {
            a.advance(ActuatorState::On, 1.0);
            b.advance(ActuatorState::On, 1.0);
        }
        assert!((a.sample(0.0) - b.sample(0.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn should_clamp_noisy_sample_at_zero() {
        let plant = PlantModel::new(0.02, 0.4, 0.1).unwrap();
        assert!(plant.sample(-0.05) >= 0.0);
    }

    #[test]
    fn should_reject_negative_rates() {
        assert!(PlantModel::new(6.5, -0.4, 0.1).is_err());
        assert!(PlantModel::new(6.5, 0.4, f64::NAN).is_err());
        assert!(PlantModel::new(-1.0, 0.4, 0.1).is_err());
    }
}
