//! AdamW optimizer (Adam with decoupled weight decay), scalar form
//!
//! AdamW applies weight decay directly to the parameters instead of folding
//! it into the gradient:
//!
//! Adam with L2: θ_t = θ_{t-1} - lr * (m_t / (√v_t + ε) + λ * θ_{t-1})
//! AdamW:        θ_t = (1 - lr * λ) * θ_{t-1} - lr * m_t / (√v_t + ε)

/// AdamW optimizer over a flat parameter vector
#[derive(Debug, Clone)]
pub struct AdamW {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    weight_decay: f32,
    t: u64,
    m: Vec<f32>,
    v: Vec<f32>,
}

impl AdamW {
    /// Create a new AdamW optimizer
    #[must_use]
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32, weight_decay: f32) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            epsilon,
            weight_decay,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// Create AdamW with default parameters (weight_decay = 0.01)
    #[must_use]
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8, 0.01)
    }

    /// Current learning rate
    #[must_use]
    pub fn lr(&self) -> f32 {
        self.lr
    }

    /// Set the learning rate
    pub fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }

    /// Optimizer step counter
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.t
    }

    /// Apply one update.
    ///
    /// Moment buffers are allocated lazily on the first step.
    ///
    /// # Panics
    ///
    /// Panics if `grads` and `params` lengths differ; that is a caller bug.
    pub fn step(&mut self, params: &mut [f32], grads: &[f32]) {
        assert_eq!(
            params.len(),
            grads.len(),
            "parameter and gradient lengths must match"
        );
        if self.m.is_empty() {
            self.m = vec![0.0; params.len()];
            self.v = vec![0.0; params.len()];
        }

        self.t += 1;

        // Bias correction folded into the step size
        let lr_t = self.lr
            * ((1.0 - self.beta2.powi(self.t as i32)).sqrt()
                / (1.0 - self.beta1.powi(self.t as i32)));

        for i in 0..params.len() {
            let g = grads[i];

            // m_t = β1 * m_{t-1} + (1 - β1) * g
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            // v_t = β2 * v_{t-1} + (1 - β2) * g²
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * g * g;

            // Decoupled weight decay, then the Adam update
            params[i] -= self.lr * self.weight_decay * params[i];
            params[i] -= lr_t * self.m[i] / (self.v[i].sqrt() + self.epsilon);
        }
    }
}
