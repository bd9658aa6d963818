/// Arc-length fractions of the ten internal landmarks, head = 0, tail = 1.
///
/// The default table follows larval anatomy: the three thoracic segments are
/// short, the abdominal segments lengthen toward the posterior. Load a
/// different table from config for other species or staging.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SegmentProportions {
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
    pub a5: f64,
    pub a6: f64,
    pub a7: f64,
}

impl Default for SegmentProportions {
    fn default() -> Self {
        Self {
            t1: 0.07,
            t2: 0.13,
            t3: 0.19,
            a1: 0.27,
            a2: 0.35,
            a3: 0.43,
            a4: 0.52,
            a5: 0.61,
            a6: 0.71,
            a7: 0.82,
        }
    }
}

impl SegmentProportions {
    /// Evenly spaced legacy placement: `0.05, 0.15, …, 0.95`.
    pub fn uniform() -> Self {
        Self::from_fractions(std::array::from_fn(|i| 0.05 + 0.1 * i as f64))
    }

    pub fn from_fractions(f: [f64; 10]) -> Self {
        Self {
            t1: f[0],
            t2: f[1],
            t3: f[2],
            a1: f[3],
            a2: f[4],
            a3: f[5],
            a4: f[6],
            a5: f[7],
            a6: f[8],
            a7: f[9],
        }
    }

    /// Fractions in head-to-tail order.
    pub fn fractions(&self) -> [f64; 10] {
        [
            self.t1, self.t2, self.t3, self.a1, self.a2, self.a3, self.a4, self.a5, self.a6,
            self.a7,
        ]
    }

    /// Every fraction finite, inside `(0, 1)`, strictly increasing.
    pub fn validate(&self) -> Result<(), String> {
        let f = self.fractions();
        if let Some(v) = f.iter().find(|v| !(v.is_finite() && **v > 0.0 && **v < 1.0)) {
            return Err(format!("segment fraction {v} is outside (0, 1)"));
        }
        if let Some(i) = (1..f.len()).find(|&i| f[i] <= f[i - 1]) {
            return Err(format!(
                "segment fractions must increase strictly: {} then {}",
                f[i - 1],
                f[i]
            ));
        }
        Ok(())
    }
}
