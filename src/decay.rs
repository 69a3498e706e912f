/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

fn validate(rate: f32, vi: f32, vf: f32) -> Result<(), String> {
    ((rate > 0.0 && vi > vf) || (rate < 0.0 && vi < vf) || (rate == 0.0 && vi == vf))
        .then_some(())
        .ok_or_else(|| String::from("`vi - vf` must have same sign as `rate`"))
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Linear {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self, String> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }

    /// Anneal from `vi` to `vf` over `steps` units of time
    pub fn annealing(vi: f32, vf: f32, steps: u64) -> Result<Self, String> {
        if steps == 0 {
            return Err(String::from("annealing needs at least one step"));
        }
        Self::new((vi - vf) / steps as f32, vi, vf)
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        if rate >= 0.0 {
            (vi - rate * t).max(vf)
        } else {
            (vi - rate * t).min(vf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_functional() {
        assert!(validate(1.0, 1.0, 0.0).is_ok());
        assert!(validate(1.0, -1.0, 0.0).is_err());
        assert!(validate(-1.0, 1.0, 0.0).is_err());
        assert!(validate(-1.0, -1.0, 0.0).is_ok());
        assert!(validate(0.0, 0.5, 0.5).is_ok());
        assert!(validate(0.0, 1.0, 0.5).is_err());
    }

    #[test]
    fn linear_decay() {
        let x = Linear::new(0.5, 2.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 1.5);
        assert_eq!(x.evaluate(10.0), 0.5);
    }

    #[test]
    fn linear_annealing() {
        let x = Linear::annealing(0.7, 0.0, 70).unwrap();
        assert!((x.evaluate(35.0) - 0.35).abs() < 1e-6, "halfway");
        assert_eq!(x.evaluate(1000.0), 0.0, "clamped at the end value");

        let flat = Linear::annealing(0.1, 0.1, 10).unwrap();
        assert_eq!(flat.evaluate(5.0), 0.1, "equal bounds stay constant");

        assert!(Linear::annealing(0.7, 0.0, 0).is_err(), "zero steps rejected");
    }
}
