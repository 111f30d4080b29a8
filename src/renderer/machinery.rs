use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Instant,
};

use anyhow::anyhow;
use image::RgbImage;
use log::{debug, info};

use crate::{
    camera::Camera,
    renderer::{RenderSettings, worker::Worker},
    scene::World,
    util::Stats,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderProgress {
    pub finished: usize,
    pub total: usize,
}

/// Renders the world as seen by the camera.
///
/// Rows are handed out to a pool of worker threads; the world is only read, so it is
/// shared between them without locking. `progress_callback` is called from the workers
/// after every finished row.
pub fn render<F: Fn(RenderProgress) + Sync>(
    world: &World,
    camera: &Camera,
    settings: &RenderSettings,
    progress_callback: F,
) -> anyhow::Result<RgbImage> {
    let state = RenderState {
        image: Mutex::new(RgbImage::new(camera.hsize(), camera.vsize())),
        total_rows: camera.vsize() as usize,
        next_row: AtomicUsize::new(0),
        finished_rows: AtomicUsize::new(0),
    };

    let thread_count = settings.thread_count().min(state.total_rows);
    info!(
        "Rendering {}x{} px on {} threads, max depth {}",
        camera.hsize(),
        camera.vsize(),
        thread_count,
        settings.max_depth
    );
    let start = Instant::now();

    let row_times = thread::scope(|scope| -> anyhow::Result<Stats> {
        let state = &state;
        let progress_callback = &progress_callback;

        let threads = (0..thread_count)
            .map(|worker_id| {
                thread::Builder::new()
                    .name(format!("worker{worker_id}"))
                    .spawn_scoped(scope, move || {
                        let mut worker = Worker::new(worker_id, camera.hsize());

                        while let Some(y) = state.get_next_row() {
                            let pixels = worker.render_row(world, camera, settings, y);
                            {
                                let mut image = state.image.lock().expect("Poisoned lock!");
                                for (x, pixel) in pixels.iter().enumerate() {
                                    image.put_pixel(x as u32, y, *pixel);
                                }
                            }

                            let finished = state.finished_rows.fetch_add(1, Ordering::AcqRel) + 1;
                            progress_callback(RenderProgress {
                                finished,
                                total: state.total_rows,
                            });
                        }

                        debug!(
                            "Worker {} done, row times [us]: {}",
                            worker.worker_id(),
                            worker.row_times()
                        );
                        worker.row_times().clone()
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        threads.into_iter().try_fold(Stats::default(), |acc, handle| {
            let stats = handle
                .join()
                .map_err(|_| anyhow!("Render worker panicked"))?;
            Ok(acc.merge(&stats))
        })
    })?;

    info!(
        "Rendered in {:.2?}, row times [us]: {}",
        start.elapsed(),
        row_times
    );

    state
        .image
        .into_inner()
        .map_err(|_| anyhow!("Poisoned image lock"))
}

struct RenderState {
    image: Mutex<RgbImage>,
    total_rows: usize,
    next_row: AtomicUsize,
    finished_rows: AtomicUsize,
}

impl RenderState {
    fn get_next_row(&self) -> Option<u32> {
        let row = self.next_row.fetch_add(1, Ordering::AcqRel);
        (row < self.total_rows).then_some(row as u32)
    }
}
