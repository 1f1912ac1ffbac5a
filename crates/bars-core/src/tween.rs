// File: crates/bars-core/src/tween.rs
// Summary: Time-keyed numeric attributes with scheduled, eased transitions.
//
// Scene attributes that can animate are stored as `Tweened` values. Scheduling a
// transition never blocks: it records a segment, and renderers sample the value
// for the current clock with `at(now)`.

/// Cubic in-out easing over `t` in `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let u = t - 2.0;
        (u * u * u + 2.0) / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    start: f64,
    end: f64,
    from: f64,
    to: f64,
    /// Interruption time; the value freezes here. Equals `end` when uninterrupted.
    stop: f64,
}

impl Segment {
    fn sample(&self, t: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return self.to;
        }
        let k = (t.min(self.stop) - self.start) / span;
        self.from + (self.to - self.from) * ease_cubic_in_out(k)
    }
}

/// An animatable scalar attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Tweened {
    base: f64,
    segments: Vec<Segment>,
}

impl Tweened {
    pub fn new(value: f64) -> Self {
        Self { base: value, segments: Vec::new() }
    }

    /// Value after every scheduled transition has completed.
    pub fn target(&self) -> f64 {
        match self.segments.last() {
            Some(s) if s.stop < s.end => s.sample(s.stop),
            Some(s) => s.to,
            None => self.base,
        }
    }

    /// Value at clock time `t` (milliseconds).
    pub fn at(&self, t: f64) -> f64 {
        let mut v = self.base;
        for s in &self.segments {
            if t < s.start {
                break;
            }
            if t >= s.stop {
                v = s.sample(s.stop);
                continue;
            }
            return s.sample(t);
        }
        v
    }

    /// Set immediately, dropping any scheduled transition.
    pub fn set(&mut self, value: f64) {
        self.base = value;
        self.segments.clear();
    }

    /// True while any segment is pending or running at `t`.
    pub fn is_animating(&self, t: f64) -> bool {
        self.segments.iter().any(|s| t < s.stop)
    }

    /// Cancel transitions at time `t`: pending ones are dropped and a running one freezes.
    pub fn interrupt(&mut self, t: f64) {
        self.segments.retain(|s| s.start < t);
        if let Some(last) = self.segments.last_mut() {
            if t < last.stop {
                last.stop = t;
            }
        }
    }

    /// Schedule a transition to `to` starting at `start` and lasting `duration`.
    /// The starting value is whatever the attribute shows at `start`.
    pub fn animate(&mut self, to: f64, start: f64, duration: f64) {
        self.interrupt(start);
        let from = self.at(start);
        let end = start + duration.max(0.0);
        self.segments.push(Segment { start, end, from, to, stop: end });
    }
}

impl From<f64> for Tweened {
    fn from(v: f64) -> Self { Self::new(v) }
}
