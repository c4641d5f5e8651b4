use super::catalog::Visualization;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationProgress {
    /// Now showing the step at this index.
    Step(usize),
    /// The last step was confirmed.
    Completed,
    /// The session was already over.
    Idle,
}

/// Walks through the steps of one guided visualization.
#[derive(Debug, Clone)]
pub struct VisualizationSession {
    visualization: &'static Visualization,
    current: usize,
    finished: bool,
}

impl VisualizationSession {
    pub fn new(visualization: &'static Visualization) -> Self {
        Self {
            visualization,
            current: 0,
            finished: false,
        }
    }

    pub fn visualization(&self) -> &'static Visualization {
        self.visualization
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_text(&self) -> Option<&'static str> {
        (!self.finished).then(|| self.visualization.steps[self.current])
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of steps reached, counting the one on screen.
    pub fn progress(&self) -> f64 {
        let total = self.visualization.steps.len();
        if self.finished {
            1.0
        } else {
            (self.current + 1) as f64 / total as f64
        }
    }

    /// Label for the confirm button on the current step.
    pub fn action_label(&self) -> &'static str {
        if self.current + 1 < self.visualization.steps.len() {
            "Next"
        } else {
            "Complete"
        }
    }

    pub fn next(&mut self) -> VisualizationProgress {
        if self.finished {
            return VisualizationProgress::Idle;
        }
        if self.current + 1 < self.visualization.steps.len() {
            self.current += 1;
            VisualizationProgress::Step(self.current)
        } else {
            self.finished = true;
            VisualizationProgress::Completed
        }
    }
}
