/// Fixed timestep simulation clock.
/// Ensures physics runs at a consistent rate regardless of frame time.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// The fixed delta time per step.
    dt: f32,
    /// Upper bound on steps run for a single frame.
    max_sub_steps: u32,
    /// Wall-clock time of the previous tick. `None` until the first tick.
    last_time: Option<f64>,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    steps_total: u64,
}

impl SimulationClock {
    pub fn new(dt: f32, max_sub_steps: u32) -> Self {
        Self {
            dt,
            max_sub_steps,
            last_time: None,
            accumulator: 0.0,
            steps_total: 0,
        }
    }

    /// Feed an absolute wall-clock reading in seconds. Returns the number of fixed
    /// steps to run. The first reading only sets the baseline and yields 0.
    pub fn tick(&mut self, now_secs: f64) -> u32 {
        let elapsed = match self.last_time {
            Some(last) => (now_secs - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_secs);
        self.accumulate(elapsed)
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    ///
    /// When more than `max_sub_steps` are owed, only `max_sub_steps` run and the
    /// backlog beyond one partial step is dropped.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_sub_steps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        self.accumulator %= self.dt;
        self.steps_total += steps as u64;
        steps
    }

    /// Interpolation alpha for rendering between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn max_sub_steps(&self) -> u32 {
        self.max_sub_steps
    }

    /// Steps handed out since creation.
    pub fn steps_total(&self) -> u64 {
        self.steps_total
    }
}
