use tracing::trace;

use crate::frame::Frame;
use crate::job::Job;

/// Runs registered per-frame jobs in a deterministic order.
#[derive(Debug)]
pub struct Scheduler<C> {
    next_order: u64,
    jobs: Vec<(u64, Job<C>)>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            next_order: 0,
            jobs: Vec::new(),
        }
    }

    pub fn add_job(&mut self, job: Job<C>) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.jobs.push((order, job));

        // Total ordering: (priority, id, insertion_order). This stays deterministic even if
        // callers register duplicate job ids.
        self.jobs.sort_by(|(oa, a), (ob, b)| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.id.cmp(b.id))
                .then_with(|| oa.cmp(ob))
        });
    }

    /// Removes every job registered under `id`, returning how many were removed.
    pub fn remove_job(&mut self, id: &str) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|(_, job)| job.id != id);
        before - self.jobs.len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Run all jobs for the given frame. Returns the number of jobs run.
    pub fn run_frame(&mut self, frame: Frame, ctx: &mut C) -> usize {
        for (_order, job) in &mut self.jobs {
            trace!(job = job.id, frame = frame.index, "run job");
            (job.run)(frame, ctx);
        }
        self.jobs.len()
    }
}
