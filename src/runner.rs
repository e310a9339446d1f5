// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runs jobs: one from the command line, or every job in a
//! configuration document.
//!
//! Batch jobs are independent of each other (each writes its own
//! file), so a small pool of workers pulls them from a shared queue.
//! The first failure stops the pool from starting anything new, and
//! the error reported is the one from the earliest failing job in
//! file order.

use std::cmp;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::{Config, JobSpec};
use crate::errors::RenderError;
use crate::job::Job;
use crate::output::RasterSink;
use crate::palette::Palette;
use crate::render::Renderer;

/// Drives the renderer and hands each finished raster to a sink.
pub struct Runner<S> {
    sink: S,
    threads: usize,
}

impl<S: RasterSink + Sync> Runner<S> {
    /// `threads` bounds the total number of worker threads, whether
    /// they are spent on one job's rows or on several jobs at once.
    pub fn new(sink: S, threads: usize) -> Self {
        Runner {
            sink,
            threads: cmp::max(threads, 1),
        }
    }

    fn execute(&self, job: &Job, palette: &Palette, threads: usize) -> Result<(), RenderError> {
        info!(
            "{}: {}x{} {:?} over {:?}, palette {} ({} colors), {} iterations",
            job.output.display(),
            job.resolution,
            job.resolution,
            job.mode,
            job.viewport,
            palette.name(),
            palette.len(),
            job.max_iterations
        );
        let raster = Renderer::new(job, palette).render(threads)?;
        self.sink.persist(&raster, &job.output)
    }

    /// Render one already-validated job with every thread we have.
    pub fn run_job(&self, job: &Job, palette: &Palette) -> Result<(), RenderError> {
        self.execute(job, palette, self.threads)
    }

    /// Validate a single job descriptor against the configuration's
    /// palettes, then render it.
    pub fn run_single(&self, config: &Config, spec: &JobSpec) -> Result<(), RenderError> {
        let job = Job::from_spec(spec)?;
        let palette = config.palette(&job.palette)?;
        self.run_job(&job, &palette)
    }

    /// Render every job in `config`.  All jobs are validated before
    /// any is rendered.  Returns the number of images written.
    pub fn run_batch(&self, config: &Config) -> Result<usize, RenderError> {
        let prepared = config
            .jobs
            .iter()
            .map(|spec| {
                let job = Job::from_spec(spec)?;
                let palette = config.palette(&job.palette)?;
                Ok((job, palette))
            })
            .collect::<Result<Vec<(Job, Palette)>, RenderError>>()?;

        if prepared.is_empty() {
            warn!("configuration has no jobs");
            return Ok(0);
        }

        let workers = cmp::min(self.threads, prepared.len());
        let per_job = cmp::max(self.threads / workers, 1);
        debug!(
            "{} jobs on {} workers, {} threads each",
            prepared.len(),
            workers,
            per_job
        );

        let queue = Arc::new(Mutex::new(prepared.iter().enumerate()));
        let failed = AtomicBool::new(false);
        let outcomes = crossbeam::scope(|spawner| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let queue = queue.clone();
                    let failed = &failed;
                    spawner.spawn(move |_| -> Result<(), (usize, RenderError)> {
                        while !failed.load(Ordering::SeqCst) {
                            let next = match queue.lock() {
                                Ok(mut jobs) => jobs.next(),
                                Err(_) => {
                                    failed.store(true, Ordering::SeqCst);
                                    let err = RenderError::Worker("job queue poisoned".to_string());
                                    return Err((usize::max_value(), err));
                                }
                            };
                            match next {
                                Some((index, (job, palette))) => {
                                    if let Err(err) = self.execute(job, palette, per_job) {
                                        failed.store(true, Ordering::SeqCst);
                                        return Err((index, err));
                                    }
                                }
                                None => break,
                            }
                        }
                        Ok(())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
        })
        .map_err(|_| RenderError::Worker("batch scope panicked".to_string()))?;

        let mut first: Option<(usize, RenderError)> = None;
        for outcome in outcomes {
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err((index, err))) => {
                    if first.as_ref().map_or(true, |(i, _)| index < *i) {
                        first = Some((index, err));
                    }
                }
                Err(_) => return Err(RenderError::Worker("a batch worker panicked".to_string())),
            }
        }
        match first {
            Some((_, err)) => Err(err),
            None => {
                info!("batch complete: {} images", prepared.len());
                Ok(prepared.len())
            }
        }
    }
}
