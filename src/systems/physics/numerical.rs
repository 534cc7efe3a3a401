use super::state_vector::StateVector;

/// Derivative function `f(t, y)` handed to a [`NumericalMethod`].
pub type Derivative<'a> = dyn FnMut(f64, &StateVector) -> StateVector + 'a;

/// Explicit one-step ODE solver.
///
/// The derivative may be evaluated several times per call, once for each
/// stage, so it must not depend on how often it has been called.
pub trait NumericalMethod: Send + Sync {
    fn name(&self) -> &'static str;

    /// Derivative evaluations per `integrate` call.
    fn stages(&self) -> usize;

    /// Advance `y0` from `t0` to `t0 + dt`.
    fn integrate(&self, t0: f64, dt: f64, y0: &StateVector, f: &mut Derivative<'_>) -> StateVector;
}

/// Classical fourth-order Runge-Kutta.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKutta4;

impl NumericalMethod for RungeKutta4 {
    fn name(&self) -> &'static str {
        "rk4"
    }

    fn stages(&self) -> usize {
        4
    }

    fn integrate(&self, t0: f64, dt: f64, y0: &StateVector, f: &mut Derivative<'_>) -> StateVector {
        let half = 0.5 * dt;
        let k1 = f(t0, y0);
        let k2 = f(t0 + half, &(y0 + k1 * half));
        let k3 = f(t0 + half, &(y0 + k2 * half));
        let k4 = f(t0 + dt, &(y0 + k3 * dt));
        y0 + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }
}

/// Heun's method (explicit trapezoidal rule), second order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heun;

impl NumericalMethod for Heun {
    fn name(&self) -> &'static str {
        "heun"
    }

    fn stages(&self) -> usize {
        2
    }

    fn integrate(&self, t0: f64, dt: f64, y0: &StateVector, f: &mut Derivative<'_>) -> StateVector {
        let k1 = f(t0, y0);
        let k2 = f(t0 + dt, &(y0 + k1 * dt));
        y0 + (k1 + k2) * (0.5 * dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn decay(_t: f64, y: &StateVector) -> StateVector {
        -y
    }

    #[test]
    fn test_rk4_exponential_decay() {
        let mut y = StateVector::from_element(1.0);
        let dt = 0.1;
        for i in 0..10 {
            y = RungeKutta4.integrate(i as f64 * dt, dt, &y, &mut decay);
        }
        assert_relative_eq!(y[0], (-1.0f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_heun_is_second_order() {
        let solve = |steps: usize| {
            let dt = 1.0 / steps as f64;
            let mut y = StateVector::from_element(1.0);
            for i in 0..steps {
                y = Heun.integrate(i as f64 * dt, dt, &y, &mut decay);
            }
            (y[0] - (-1.0f64).exp()).abs()
        };
        let ratio = solve(10) / solve(20);
        assert!(ratio > 3.5 && ratio < 4.5, "error ratio {ratio}");
    }

    #[test]
    fn test_stage_count_matches_evaluations() {
        for method in [&RungeKutta4 as &dyn NumericalMethod, &Heun] {
            let mut calls = 0;
            let mut counting = |_t: f64, y: &StateVector| {
                calls += 1;
                *y
            };
            method.integrate(0.0, 0.1, &StateVector::zeros(), &mut counting);
            assert_eq!(calls, method.stages(), "{}", method.name());
        }
    }

    #[test]
    fn test_time_argument_spans_interval() {
        let mut times = Vec::new();
        let mut record = |t: f64, _y: &StateVector| {
            times.push(t);
            StateVector::zeros()
        };
        RungeKutta4.integrate(2.0, 0.5, &StateVector::zeros(), &mut record);
        assert_eq!(times, vec![2.0, 2.25, 2.25, 2.5]);
    }
}
