//! Frame scheduler
//!
//! Per-frame loops are registered as tasks on a `FrameDriver`. In the browser
//! a single `requestAnimationFrame` loop calls `run_frame`; tests call it
//! directly with a fake clock.

/// What a task wants after running for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Run again next frame
    Continue,
    /// Drop this task for good
    Stop,
}

/// Handle returned by `FrameDriver::register`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u32);

type Task = Box<dyn FnMut(f64) -> LoopControl>;

/// Owns every live per-frame task
#[derive(Default)]
pub struct FrameDriver {
    tasks: Vec<(TaskHandle, &'static str, Task)>,
    next_id: u32,
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task; it first runs on the next frame
    pub fn register<F>(&mut self, name: &'static str, task: F) -> TaskHandle
    where
        F: FnMut(f64) -> LoopControl + 'static,
    {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push((handle, name, Box::new(task)));
        log::debug!("Frame task '{}' registered", name);
        handle
    }

    /// Cancel a task. Returns false if it already stopped.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|(h, _, _)| *h != handle);
        before != self.tasks.len()
    }

    pub fn is_active(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|(h, _, _)| *h == handle)
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run every task once, dropping those that stop
    pub fn run_frame(&mut self, now: f64) {
        self.frames += 1;
        self.tasks.retain_mut(|(_, name, task)| match task(now) {
            LoopControl::Continue => true,
            LoopControl::Stop => {
                log::info!("Frame task '{}' stopped", name);
                false
            }
        });
    }
}
